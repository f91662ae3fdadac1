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

use crate::config::AuthConfig;
use crate::generate::{generate_async, generate_blocking};
use dsql_auth_core::utils::Redact;
use dsql_auth_core::{Error, Result};
use http::request::Parts;
use std::fmt::{Debug, Formatter};

/// A generated auth token, used as the database password.
///
/// The token starts out empty. Each successful generation replaces the
/// previous value, a failed one leaves it as it was.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct AuthToken {
    token: Option<String>,
}

impl AuthToken {
    /// Create an empty token.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current token, if one has been generated.
    pub fn as_str(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Drop the current token.
    pub fn clear(&mut self) {
        self.token = None;
    }

    /// Consume self and return the current token.
    pub fn into_inner(self) -> Option<String> {
        self.token
    }

    /// Generate a token, blocking the calling thread until it is ready.
    ///
    /// Safe to call from inside an async runtime, the wait then happens on a
    /// helper thread.
    pub fn generate(&mut self, config: &AuthConfig, admin: bool) -> Result<&str> {
        let token = generate_blocking(config, admin)?;
        Ok(self.replace(token))
    }

    /// Generate a token without blocking.
    pub async fn generate_async(&mut self, config: &AuthConfig, admin: bool) -> Result<&str> {
        let token = generate_async(config, admin).await?;
        Ok(self.replace(token))
    }

    fn replace(&mut self, token: String) -> &str {
        self.clear();
        self.token.insert(token)
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}

/// Generate a token in one call, blocking until it is ready.
pub fn generate_token(config: &AuthConfig, admin: bool) -> Result<String> {
    generate_blocking(config, admin)
}

/// Join the hostname with the signed request's path and query.
pub fn assemble_token(hostname: &str, req: &Parts) -> Result<String> {
    let Some(paq) = req.uri.path_and_query() else {
        return Err(Error::request_invalid("signed request has no path"));
    };
    Ok(format!("{hostname}{paq}"))
}
