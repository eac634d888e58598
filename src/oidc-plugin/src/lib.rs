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

//! Exchange a CI-issued OIDC token for Google Cloud credentials.
//!
//! This crate implements a pipeline step that uses [Workload Identity
//! Federation] to turn the identity token issued by the CI platform into
//! credentials for a Google Cloud service account, without storing a
//! long-lived service account key.
//!
//! The step runs in one of two modes:
//!
//! * Token mode exchanges the OIDC token at the Security Token Service,
//!   impersonates the service account, and publishes the resulting access
//!   token as the `GCLOUD_ACCESS_TOKEN` secret.
//! * Credentials file mode writes an `external_account` [ADC] file and
//!   publishes its path as `GOOGLE_APPLICATION_CREDENTIALS`. The Google client
//!   libraries that load this file perform the exchange themselves.
//!
//! ```no_run
//! # use gcp_oidc_plugin::config::Settings;
//! # use gcp_oidc_plugin::output::OutputSink;
//! # use gcp_oidc_plugin::plugin::Plugin;
//! # async fn sample() -> anyhow::Result<()> {
//! let settings = Settings {
//!     oidc_token: Some("eyJhbGciOi...".to_string()),
//!     project_id: Some("123456789".to_string()),
//!     pool_id: Some("my-pool".to_string()),
//!     provider_id: Some("my-provider".to_string()),
//!     service_account_email: Some("ci@my-project.iam.gserviceaccount.com".to_string()),
//!     ..Settings::default()
//! };
//! let client = gcp_oidc_plugin::transport::Builder::default().build()?;
//! let outcome = Plugin::new(settings.resolve()?, client)
//!     .with_output_sink(OutputSink::new(None, Some("/tmp/secrets.env".into())))
//!     .run()
//!     .await?;
//! println!("{outcome:?}");
//! # Ok(()) }
//! ```
//!
//! [Workload Identity Federation]: https://cloud.google.com/iam/docs/workload-identity-federation
//! [ADC]: https://cloud.google.com/docs/authentication/application-default-credentials

pub mod config;
pub mod constants;
pub mod errors;
pub mod external_account;
pub mod impersonated;
pub mod output;
pub mod plugin;
pub mod sts_exchange;
pub mod token;
pub mod transport;

/// A `Result` alias where the `Err` case is [errors::Error].
pub type Result<T> = std::result::Result<T, crate::errors::Error>;
