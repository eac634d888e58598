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

//! Resolves the plugin settings into a validated [ExchangeRequest].
//!
//! The settings are collected once, at the process boundary, and passed by
//! value into [Settings::resolve]. Nothing in this crate reads the process
//! environment directly.

use crate::Result;
use crate::constants::{DEFAULT_LIFETIME_SECS, DEFAULT_SCOPE};
use crate::errors::{Error, MissingField};

/// Selects how the plugin publishes credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Exchange and impersonate, then publish `GCLOUD_ACCESS_TOKEN`.
    #[default]
    Token,
    /// Write an `external_account` ADC file, then publish
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    CredentialsFile,
}

/// The raw plugin settings, as provided by the CI runner.
///
/// All fields are optional here. [Settings::resolve] reports the first
/// required field that is missing.
#[derive(Clone, Default)]
pub struct Settings {
    pub oidc_token: Option<String>,
    pub project_id: Option<String>,
    pub pool_id: Option<String>,
    pub provider_id: Option<String>,
    pub service_account_email: Option<String>,
    /// The requested access token lifetime, in seconds.
    pub duration: Option<u64>,
    pub scope: Option<String>,
    pub create_credentials_file: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("oidc_token", &self.oidc_token.as_ref().map(|_| "[censored]"))
            .field("project_id", &self.project_id)
            .field("pool_id", &self.pool_id)
            .field("provider_id", &self.provider_id)
            .field("service_account_email", &self.service_account_email)
            .field("duration", &self.duration)
            .field("scope", &self.scope)
            .field("create_credentials_file", &self.create_credentials_file)
            .finish()
    }
}

impl Settings {
    /// Validates the settings and applies the defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing field, in the
    /// order: OIDC token, project, pool, provider, service account.
    pub fn resolve(self) -> Result<ExchangeRequest> {
        let oidc_token = required(self.oidc_token, MissingField::OidcToken)?;
        let project_id = required(self.project_id, MissingField::ProjectId)?;
        let pool_id = required(self.pool_id, MissingField::PoolId)?;
        let provider_id = required(self.provider_id, MissingField::ProviderId)?;
        let service_account_email =
            required(self.service_account_email, MissingField::ServiceAccountEmail)?;

        let lifetime = format!("{}s", self.duration.unwrap_or(DEFAULT_LIFETIME_SECS));
        let scope = self.scope.filter(|s| !s.is_empty());
        let mode = if self.create_credentials_file {
            Mode::CredentialsFile
        } else {
            Mode::Token
        };
        if mode == Mode::CredentialsFile && scope.is_some() {
            // The external_account format has no scope field, clients
            // configure scopes themselves. See https://google.aip.dev/auth/4117
            tracing::warn!("the scope setting does not apply in credentials file mode, ignoring it");
        }

        Ok(ExchangeRequest {
            oidc_token,
            project_id,
            pool_id,
            provider_id,
            service_account_email,
            scope: scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            lifetime,
            mode,
        })
    }
}

fn required(value: Option<String>, field: MissingField) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::missing(field))
}

/// A validated request to obtain Google Cloud credentials.
#[derive(Clone, PartialEq)]
pub struct ExchangeRequest {
    pub oidc_token: String,
    pub project_id: String,
    pub pool_id: String,
    pub provider_id: String,
    pub service_account_email: String,
    /// The OAuth scope for the access token.
    pub scope: String,
    /// The access token lifetime, as a duration string such as `"3600s"`.
    pub lifetime: String,
    pub mode: Mode,
}

impl ExchangeRequest {
    /// The workload identity provider audience for this request.
    pub fn audience(&self) -> String {
        crate::constants::audience(&self.project_id, &self.pool_id, &self.provider_id)
    }
}

impl std::fmt::Debug for ExchangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRequest")
            .field("oidc_token", &"[censored]")
            .field("project_id", &self.project_id)
            .field("pool_id", &self.pool_id)
            .field("provider_id", &self.provider_id)
            .field("service_account_email", &self.service_account_email)
            .field("scope", &self.scope)
            .field("lifetime", &self.lifetime)
            .field("mode", &self.mode)
            .finish()
    }
}
