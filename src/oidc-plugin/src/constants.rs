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

//! Protocol constants for the Google STS, IAM Credentials and ADC formats.
//!
//! None of these are configurable. They are dictated by Google's external
//! account and token exchange contracts.

/// The scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
/// Requested access token lifetime, in seconds, when none is configured.
pub const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Google's Security Token Service endpoint.
pub const STS_TOKEN_URL: &str = "https://sts.googleapis.com/v1/token";
/// Base URL for the IAM Credentials API.
pub const IAM_CREDENTIALS_ENDPOINT: &str = "https://iamcredentials.googleapis.com";

/// Token Exchange OAuth Grant Type
pub(crate) const TOKEN_EXCHANGE_GRANT_TYPE: &str =
    "urn:ietf:params:oauth:grant-type:token-exchange";
/// Access Token OAuth Token Type
pub(crate) const ACCESS_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:access_token";
/// OIDC ID Token OAuth Token Type
pub const ID_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:id_token";

/// The `type` of an external account credentials file.
pub const EXTERNAL_ACCOUNT_TYPE: &str = "external_account";

/// Used when the CI runner does not provide a usable workspace.
pub const DEFAULT_WORKSPACE: &str = "/home/harness";
pub(crate) const ID_TOKEN_DIR: &str = "tmp";
pub(crate) const ID_TOKEN_FILE: &str = "id_token";
pub(crate) const ADC_DIR: &str = ".config/gcloud";
pub(crate) const ADC_FILE: &str = "application_default_credentials.json";

/// Output key for the credentials file path.
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Secret output key for the access token.
pub const GCLOUD_ACCESS_TOKEN: &str = "GCLOUD_ACCESS_TOKEN";

/// Returns the workload identity provider audience.
pub fn audience(project_id: &str, pool_id: &str, provider_id: &str) -> String {
    format!(
        "//iam.googleapis.com/projects/{project_id}/locations/global/workloadIdentityPools/{pool_id}/providers/{provider_id}"
    )
}

/// Returns the `generateAccessToken` URL for `service_account_email`.
pub fn impersonation_url(endpoint: &str, service_account_email: &str) -> String {
    format!(
        "{endpoint}/v1/projects/-/serviceAccounts/{service_account_email}:generateAccessToken"
    )
}
