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

//! Blocking adapters over the async credential and signing traits.

use dsql_auth_core::{Context, Error, ProvideCredential, Result, SignRequest};
use http::request::Parts;
use log::debug;
use std::future::Future;
use std::panic;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};

/// Blocking drives async providers and signers to completion on the calling
/// thread.
///
/// Every instance owns a fresh single threaded runtime that is torn down when
/// the instance is dropped. Instances only exist inside [`Blocking::run`], so a
/// runtime is never reused across calls and never dropped from within an
/// async context.
///
/// There is no timeout: a provider whose future never resolves blocks the
/// caller forever.
#[derive(Debug)]
pub struct Blocking {
    rt: Runtime,
}

impl Blocking {
    fn new() -> Result<Self> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::unexpected("failed to build runtime for blocking call").with_source(e)
            })?;
        Ok(Self { rt })
    }

    /// Run `f` with a freshly built `Blocking`.
    ///
    /// When the calling thread is already inside a tokio runtime the whole
    /// call is moved onto a scoped helper thread and the caller waits for it
    /// to finish. Panics raised by `f` are resumed on the calling thread.
    pub fn run<T, F>(f: F) -> Result<T>
    where
        F: FnOnce(&Blocking) -> Result<T> + Send,
        T: Send,
    {
        let call = move || {
            let blocking = Blocking::new()?;
            f(&blocking)
        };

        if Handle::try_current().is_err() {
            return call();
        }

        debug!("inside an async runtime, blocking on a helper thread");
        thread::scope(|s| match s.spawn(call).join() {
            Ok(v) => v,
            Err(payload) => panic::resume_unwind(payload),
        })
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }

    /// Wait for `provider` to hand out a credential.
    ///
    /// Provider errors are returned untouched. A provider that finishes
    /// without a credential is reported as `InvalidState`.
    pub fn load_credential<P>(&self, provider: &P, ctx: &Context) -> Result<P::Credential>
    where
        P: ProvideCredential + ?Sized,
    {
        match self.block_on(provider.provide_credential(ctx))? {
            Some(cred) => Ok(cred),
            None => Err(no_credential()),
        }
    }

    /// Wait for `signer` to presign `req` in place.
    pub fn sign<S>(
        &self,
        signer: &S,
        ctx: &Context,
        req: &mut Parts,
        credential: &S::Credential,
        expires_in: Duration,
    ) -> Result<()>
    where
        S: SignRequest + ?Sized,
    {
        self.block_on(signer.sign_request(ctx, req, Some(credential), Some(expires_in)))
    }
}

pub(crate) fn no_credential() -> Error {
    Error::invalid_state("credential provider returned no credential")
}
