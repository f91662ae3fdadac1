// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::DEFAULT_EXPIRES_IN;
use crate::region::parse_region;
use crate::Credential;
use dsql_auth_core::time::{from_unix_nanos, now_unix_nanos, DateTime};
use dsql_auth_core::{Context, Error, ProvideCredential, Result};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to a credential provider.
pub type SharedCredentialProvider = Arc<dyn ProvideCredential<Credential = Credential>>;

/// Clock override returning nanoseconds since the unix epoch.
pub type ClockFn = fn() -> Result<u64>;

/// Configuration for generating DSQL auth tokens.
///
/// ```
/// use dsql_auth::{AuthConfig, StaticCredentialProvider};
///
/// let config = AuthConfig::new("24abtvxzzxzrrfaxyduobmpfea.dsql.us-east-1.on.aws")
///     .with_inferred_region()
///     .unwrap()
///     .with_expires_in(450)
///     .with_credential_provider(StaticCredentialProvider::new("akid", "secret"));
///
/// assert_eq!(config.region(), Some("us-east-1"));
/// ```
#[derive(Clone)]
pub struct AuthConfig {
    hostname: String,
    region: Option<String>,
    expires_in: u64,
    credential_provider: Option<SharedCredentialProvider>,
    clock: Option<ClockFn>,
    context: Context,
}

impl AuthConfig {
    /// Create a config for the given cluster endpoint.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            region: None,
            expires_in: 0,
            credential_provider: None,
            clock: None,
            context: Context::new(),
        }
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.set_region(region);
        self
    }

    /// Set the region by parsing it out of the hostname.
    pub fn with_inferred_region(mut self) -> Result<Self> {
        self.region = Some(self.infer_region()?);
        Ok(self)
    }

    /// Set the token lifetime in seconds, `0` means the default of 900.
    pub fn with_expires_in(mut self, expires_in: u64) -> Self {
        self.set_expires_in(expires_in);
        self
    }

    /// Set the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.set_credential_provider(Arc::new(provider));
        self
    }

    /// Set an already shared credential provider.
    pub fn with_shared_credential_provider(mut self, provider: SharedCredentialProvider) -> Self {
        self.set_credential_provider(provider);
        self
    }

    /// Override the clock used for the signing time.
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.set_clock(clock);
        self
    }

    /// Set the context handed to the credential provider.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Replace the hostname.
    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
    }

    /// Replace the region.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.region = Some(region.into());
    }

    /// Replace the token lifetime in seconds.
    pub fn set_expires_in(&mut self, expires_in: u64) {
        self.expires_in = expires_in;
    }

    /// Replace the credential provider, dropping the previous handle.
    pub fn set_credential_provider(&mut self, provider: SharedCredentialProvider) {
        self.credential_provider = Some(provider);
    }

    /// Replace the clock override.
    pub fn set_clock(&mut self, clock: ClockFn) {
        self.clock = Some(clock);
    }

    /// Parse the region out of the configured hostname.
    pub fn infer_region(&self) -> Result<String> {
        parse_region(&self.hostname)
    }

    /// The cluster endpoint.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The signing region, if set.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The effective token lifetime.
    pub fn expires_in(&self) -> Duration {
        match self.expires_in {
            0 => Duration::from_secs(DEFAULT_EXPIRES_IN),
            v => Duration::from_secs(v),
        }
    }

    /// The credential provider, if set.
    pub fn credential_provider(&self) -> Option<&SharedCredentialProvider> {
        self.credential_provider.as_ref()
    }

    /// The context handed to the credential provider.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Signing time taken from the clock override, or the system clock.
    pub fn signing_time(&self) -> Result<DateTime> {
        let nanos = match self.clock {
            Some(clock) => clock()?,
            None => now_unix_nanos()?,
        };
        from_unix_nanos(nanos)
    }

    /// Check every field generation relies on.
    pub(crate) fn validate(&self) -> Result<ValidatedConfig<'_>> {
        if self.hostname.is_empty() {
            return Err(Error::invalid_argument("hostname is required"));
        }
        let region = match self.region.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => return Err(Error::invalid_argument("region is required")),
        };
        let Some(provider) = self.credential_provider.as_ref() else {
            return Err(Error::invalid_argument("credential provider is required"));
        };

        Ok(ValidatedConfig {
            hostname: &self.hostname,
            region,
            provider: provider.as_ref(),
            expires_in: self.expires_in(),
        })
    }
}

impl Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("hostname", &self.hostname)
            .field("region", &self.region)
            .field("expires_in", &self.expires_in)
            .field("credential_provider", &self.credential_provider)
            .field("clock", &self.clock.map(|_| "custom"))
            .finish_non_exhaustive()
    }
}

/// Borrowed view of an `AuthConfig` that passed validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidatedConfig<'a> {
    pub hostname: &'a str,
    pub region: &'a str,
    pub provider: &'a dyn ProvideCredential<Credential = Credential>,
    pub expires_in: Duration,
}
