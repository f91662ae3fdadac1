use crate::{Context, Result};
use std::fmt::Debug;
use std::time::Duration;

/// ProvideCredential is the trait used to load the credential from the environment.
///
/// The returned future may be driven by any executor and may complete on any
/// thread. Callers that need a blocking answer bridge it themselves.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this loader.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load signing credential from current env.
    ///
    /// - `Ok(Some(cred))`: a credential was found.
    /// - `Ok(None)`: this provider has nothing to offer.
    /// - `Err(err)`: loading failed, the error is surfaced as is.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to sign the request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// ## Credential
    ///
    /// The `credential` parameter is the credential required by the signer to sign the request.
    ///
    /// ## Expires In
    ///
    /// The `expires_in` parameter specifies the expiration time for the result.
    /// Signers that embed the signature in the query string require it, others
    /// may reject it.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()>;
}
