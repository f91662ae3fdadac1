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

//! Print an Aurora DSQL auth token to stdout.

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use dsql_auth::{generate_token, AuthConfig, DefaultCredentialProvider};
use dsql_auth_core::{Context, OsEnv};
use dsql_auth_file_read_tokio::TokioFileRead;
use log::debug;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dsql-token")]
#[command(version, about = "Generate an Aurora DSQL auth token", long_about = None)]
struct Cli {
    /// The hostname of the Aurora DSQL cluster
    #[arg(long)]
    hostname: String,

    /// The AWS region, detected from the hostname when omitted
    #[arg(long)]
    region: Option<String>,

    /// Token lifetime in seconds, 0 means the default of 900
    #[arg(long, default_value_t = 0)]
    expires_in: u64,

    /// Generate a token for the admin role
    #[arg(long)]
    admin: bool,
}

fn build_config(cli: &Cli, ctx: Context) -> Result<AuthConfig> {
    let config = AuthConfig::new(cli.hostname.as_str())
        .with_expires_in(cli.expires_in)
        .with_context(ctx)
        .with_credential_provider(DefaultCredentialProvider::new());

    match &cli.region {
        Some(region) => Ok(config.with_region(region.as_str())),
        None => config.with_inferred_region().map_err(|err| {
            debug!("region inference failed: {err}");
            anyhow!(
                "Failed to infer AWS region from hostname. Please provide region explicitly with --region."
            )
        }),
    }
}

fn run(cli: &Cli) -> Result<String> {
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_env(OsEnv);
    let config = build_config(cli, ctx)?;
    debug!("generating token with {config:?}");

    generate_token(&config, cli.admin).context("Failed to generate auth token")
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(token) => {
            println!("{token}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
