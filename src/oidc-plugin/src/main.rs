// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A CI pipeline step that obtains Google Cloud credentials with Workload
//! Identity Federation.

mod args;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use gcp_oidc_plugin::errors::Error;
use gcp_oidc_plugin::plugin::{Outcome, Plugin};
use gcp_oidc_plugin::transport::Builder as ClientBuilder;

const DESCRIPTION: &str = concat!(
    "Exchanges the OIDC token issued by the CI platform for Google Cloud credentials.",
    " By default the plugin impersonates a service account and publishes a short-lived",
    " access token as the GCLOUD_ACCESS_TOKEN secret output.",
    " With --create-application-credentials-file it writes an external_account",
    " credentials file instead, and publishes its path as GOOGLE_APPLICATION_CREDENTIALS."
);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = enable_tracing(&args);

    let request = args
        .settings()
        .resolve()
        .context("invalid plugin configuration")?;
    tracing::debug!("Configuration: {request:?}");

    let client = ClientBuilder::default()
        .with_timeout(args.timeout())
        .build()
        .context("cannot create the HTTP client")?;
    let plugin = Plugin::new(request, client)
        .with_workspace(args.workspace.clone())
        .with_output_sink(args.output_sink());

    let interrupted = interrupted().context("cannot listen for termination signals")?;
    let outcome = tokio::select! {
        outcome = plugin.run() => outcome,
        signal = interrupted => {
            signal.context("cannot listen for termination signals")?;
            Err(Error::cancelled())
        }
    };
    match outcome.context("cannot obtain Google Cloud credentials")? {
        Outcome::AccessToken(token) => {
            tracing::debug!("access token expires at {:?}", token.expire_time())
        }
        Outcome::CredentialsFile(path) => tracing::debug!("done: {}", path.display()),
    }
    Ok(())
}

/// Resolves when the process receives SIGINT, or SIGTERM on Unix.
///
/// The SIGTERM handler is installed before this function returns.
#[cfg(unix)]
fn interrupted() -> std::io::Result<impl Future<Output = std::io::Result<()>>> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            r = tokio::signal::ctrl_c() => r,
            _ = terminate.recv() => Ok(()),
        }
    })
}

#[cfg(not(unix))]
fn interrupted() -> std::io::Result<impl Future<Output = std::io::Result<()>>> {
    Ok(tokio::signal::ctrl_c())
}

fn enable_tracing(args: &Args) -> tracing::dispatcher::DefaultGuard {
    let level = args.log_level();
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level.unwrap_or(tracing::Level::INFO))
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    if level.is_none() {
        tracing::warn!(
            "unknown log level {:?}, using the default info level",
            args.log_level
        );
    }
    guard
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn terminate_interrupts() -> anyhow::Result<()> {
        let interrupted = interrupted()?;
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()?;
        assert!(status.success(), "{status:?}");
        interrupted.await?;
        Ok(())
    }
}
