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

use dsql_auth_core::{Error, Result};
use http::header::HOST;
use http::request::Parts;
use http::Method;
use std::fmt::{Display, Formatter};

/// The database action a token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Connect as a regular database role.
    DbConnect,
    /// Connect as the `admin` role.
    DbConnectAdmin,
}

impl Action {
    /// Name of the action as it appears in the `Action` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::DbConnect => "DbConnect",
            Action::DbConnectAdmin => "DbConnectAdmin",
        }
    }

    /// Pick the action for the given admin flag.
    pub fn from_admin(admin: bool) -> Self {
        if admin {
            Action::DbConnectAdmin
        } else {
            Action::DbConnect
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the unsigned `GET /?Action=<action>` request for a cluster endpoint.
///
/// The hostname is carried in the `Host` header only, the uri stays in
/// origin form so the assembled token starts with the bare hostname.
pub fn build_request(action: Action, hostname: &str) -> Result<Parts> {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri(format!("/?Action={action}"))
        .header(HOST, hostname)
        .body(())
        .map_err(|e| {
            Error::request_invalid(format!("failed to build {action} request for {hostname:?}"))
                .with_source(anyhow::Error::new(e))
        })?;

    Ok(req.into_parts().0)
}
