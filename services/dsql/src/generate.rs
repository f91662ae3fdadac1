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

use crate::blocking::{no_credential, Blocking};
use crate::config::{AuthConfig, ValidatedConfig};
use crate::constants::DSQL_SERVICE;
use crate::request::{build_request, Action};
use crate::sign_request::RequestSigner;
use crate::token::assemble_token;
use dsql_auth_core::{Result, SignRequest};
use log::debug;

#[derive(Debug, Clone, Copy)]
enum Stage {
    Validated,
    CredentialsFetched,
    RequestBuilt,
    Signed,
    Assembled,
}

fn enter(hostname: &str, stage: Stage) {
    debug!("generating token for {hostname}: {stage:?}");
}

fn log_failure<T>(hostname: &str, res: Result<T>) -> Result<T> {
    if let Err(err) = &res {
        debug!("generating token for {hostname}: Failed: {err}");
    }
    res
}

fn signer(config: &AuthConfig, cfg: &ValidatedConfig<'_>) -> Result<RequestSigner> {
    Ok(RequestSigner::new(DSQL_SERVICE, cfg.region).with_time(config.signing_time()?))
}

/// Run every stage on the calling thread, bridging the async traits.
pub(crate) fn generate_blocking(config: &AuthConfig, admin: bool) -> Result<String> {
    let hostname = config.hostname();
    let res = config.validate().and_then(|cfg| {
        enter(hostname, Stage::Validated);

        Blocking::run(|b| {
            let ctx = config.context();

            let cred = b.load_credential(cfg.provider, ctx)?;
            enter(hostname, Stage::CredentialsFetched);

            let mut req = build_request(Action::from_admin(admin), cfg.hostname)?;
            enter(hostname, Stage::RequestBuilt);

            b.sign(&signer(config, &cfg)?, ctx, &mut req, &cred, cfg.expires_in)?;
            enter(hostname, Stage::Signed);

            let token = assemble_token(cfg.hostname, &req)?;
            enter(hostname, Stage::Assembled);
            Ok(token)
        })
    });

    log_failure(hostname, res)
}

/// Same stages as [`generate_blocking`], awaiting directly.
pub(crate) async fn generate_async(config: &AuthConfig, admin: bool) -> Result<String> {
    let hostname = config.hostname();
    let res = async {
        let cfg = config.validate()?;
        enter(hostname, Stage::Validated);

        let ctx = config.context();
        let cred = cfg
            .provider
            .provide_credential(ctx)
            .await?
            .ok_or_else(no_credential)?;
        enter(hostname, Stage::CredentialsFetched);

        let mut req = build_request(Action::from_admin(admin), cfg.hostname)?;
        enter(hostname, Stage::RequestBuilt);

        signer(config, &cfg)?
            .sign_request(ctx, &mut req, Some(&cred), Some(cfg.expires_in))
            .await?;
        enter(hostname, Stage::Signed);

        let token = assemble_token(cfg.hostname, &req)?;
        enter(hostname, Stage::Assembled);
        Ok(token)
    }
    .await;

    log_failure(hostname, res)
}
