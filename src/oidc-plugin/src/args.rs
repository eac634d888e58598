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

use clap::Parser;
use clap::builder::BoolishValueParser;
use gcp_oidc_plugin::config::Settings;
use gcp_oidc_plugin::output::OutputSink;
use gcp_oidc_plugin::transport::DEFAULT_TIMEOUT;
use humantime::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration options for the plugin.
///
/// Every option can be set through its environment variable, this is how the
/// CI runner configures the plugin. None of the options are required here,
/// missing values are reported when the settings are resolved.
#[derive(Clone, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The OIDC token issued by the CI platform.
    #[arg(long, env = "PLUGIN_OIDC_TOKEN_ID", hide_env_values = true)]
    pub oidc_token: Option<String>,

    /// The Google Cloud project number hosting the workload identity pool.
    #[arg(long, env = "PLUGIN_PROJECT_ID")]
    pub project_id: Option<String>,

    /// The workload identity pool ID.
    #[arg(long, env = "PLUGIN_POOL_ID")]
    pub pool_id: Option<String>,

    /// The workload identity provider ID.
    #[arg(long, env = "PLUGIN_PROVIDER_ID")]
    pub provider_id: Option<String>,

    /// The email of the service account to impersonate.
    #[arg(long, env = "PLUGIN_SERVICE_ACCOUNT_EMAIL_ID")]
    pub service_account_email: Option<String>,

    /// The access token lifetime, in seconds. Defaults to 3600.
    ///
    /// An empty value is the same as no value.
    #[arg(long, env = "PLUGIN_DURATION", value_parser = parse_seconds)]
    pub duration: Option<String>,

    /// The OAuth scope for the access token.
    ///
    /// Defaults to `https://www.googleapis.com/auth/cloud-platform`. Ignored
    /// when creating a credentials file, the `external_account` format has no
    /// scopes.
    #[arg(long, env = "PLUGIN_SCOPE")]
    pub scope: Option<String>,

    /// Write an application default credentials file instead of fetching an
    /// access token.
    #[arg(
        long,
        env = "PLUGIN_CREATE_APPLICATION_CREDENTIALS_FILE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub create_application_credentials_file: bool,

    /// The log level: trace, debug, info, warn, or error.
    #[arg(long, env = "PLUGIN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// The directory for the credentials file and the persisted OIDC token.
    #[arg(long, env = "DRONE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// The file receiving plain output values.
    #[arg(long, env = "DRONE_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// The file receiving secret output values.
    #[arg(long, env = "HARNESS_OUTPUT_SECRET_FILE")]
    pub secret_output_file: Option<PathBuf>,

    /// The deadline for each request to Google Cloud.
    #[arg(long, env = "PLUGIN_TIMEOUT", value_parser = parse_duration, default_value = "30s")]
    pub timeout: Duration,
}

impl Args {
    /// The settings used to build the exchange request.
    pub fn settings(&self) -> Settings {
        Settings {
            oidc_token: self.oidc_token.clone(),
            project_id: self.project_id.clone(),
            pool_id: self.pool_id.clone(),
            provider_id: self.provider_id.clone(),
            service_account_email: self.service_account_email.clone(),
            duration: self.duration(),
            scope: self.scope.clone(),
            create_credentials_file: self.create_application_credentials_file,
        }
    }

    pub fn output_sink(&self) -> OutputSink {
        OutputSink::new(self.output_file.clone(), self.secret_output_file.clone())
    }

    /// The token lifetime in seconds, `None` if not set or empty.
    pub fn duration(&self) -> Option<u64> {
        self.duration
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
    }

    /// The log level, `None` if it cannot be parsed.
    pub fn log_level(&self) -> Option<tracing::Level> {
        match self.log_level.to_ascii_lowercase().as_str() {
            "warning" => Some(tracing::Level::WARN),
            level => level.parse().ok(),
        }
    }

    pub fn timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }
}

// Accepts an empty value, the CI runner exports unset settings as empty
// strings.
fn parse_seconds(value: &str) -> Result<String, std::num::ParseIntError> {
    if !value.is_empty() {
        value.parse::<u64>()?;
    }
    Ok(value.to_string())
}
