//! Auth token generation for Aurora DSQL clusters.
//!
//! A token is a SigV4 presigned `GET /?Action=DbConnect` (or
//! `DbConnectAdmin`) request addressed to the cluster endpoint, rendered as
//! `<hostname>/?Action=...&X-Amz-Signature=...`. It is used in place of a
//! database password.
//!
//! ```no_run
//! use dsql_auth::{AuthConfig, AuthToken, DefaultCredentialProvider};
//! use dsql_auth_core::{Context, OsEnv};
//!
//! # fn main() -> dsql_auth_core::Result<()> {
//! let config = AuthConfig::new("24abtvxzzxzrrfaxyduobmpfea.dsql.us-east-1.on.aws")
//!     .with_inferred_region()?
//!     .with_context(Context::new().with_env(OsEnv))
//!     .with_credential_provider(DefaultCredentialProvider::new());
//!
//! let mut token = AuthToken::new();
//! let password = token.generate(&config, false)?;
//! # let _ = password;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod blocking;
pub use blocking::Blocking;

mod config;
pub use config::{AuthConfig, ClockFn, SharedCredentialProvider};

mod constants;
pub use constants::DEFAULT_EXPIRES_IN;

mod credential;
pub use credential::Credential;

mod generate;

mod provide_credential;
pub use provide_credential::*;

mod region;
pub use region::parse_region;

mod request;
pub use request::{build_request, Action};

mod sign_request;
pub use sign_request::RequestSigner;

mod token;
pub use token::{assemble_token, generate_token, AuthToken};
