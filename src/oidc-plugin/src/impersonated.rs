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

//! Obtains a short-lived access token by impersonating a service account.
//!
//! The federated token authenticates the call to the IAM Credentials
//! [generateAccessToken] method. Failures are terminal, there is no fallback.
//!
//! [generateAccessToken]: https://cloud.google.com/iam/docs/reference/credentials/rest/v1/projects.serviceAccounts/generateAccessToken

use crate::Result;
use crate::errors::Error;
use crate::token::{AccessToken, FederatedToken};
use http::header::AUTHORIZATION;

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
struct GenerateAccessTokenRequest {
    scope: Vec<String>,
    lifetime: String,
}

#[derive(serde::Deserialize)]
struct GenerateAccessTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expireTime", default)]
    expire_time: Option<String>,
}

/// Exchanges `source` for an access token of the service account addressed
/// by `service_account_impersonation_url`.
///
/// The `lifetime` is a duration string such as `"3600s"`. The service
/// enforces it, this function does not validate the returned expiration.
pub async fn generate_access_token(
    client: &reqwest::Client,
    source: &FederatedToken,
    scope: &str,
    lifetime: &str,
    service_account_impersonation_url: &str,
) -> Result<AccessToken> {
    let url = service_account_impersonation_url;
    let body = GenerateAccessTokenRequest {
        scope: vec![scope.to_string()],
        lifetime: lifetime.to_string(),
    };
    tracing::debug!(%url, %lifetime, "requesting impersonated access token");

    let response = client
        .post(url)
        .header(
            AUTHORIZATION,
            format!("{} {}", source.token_type(), source.secret()),
        )
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::impersonation(url, e))?;

    let status = response.status();
    tracing::debug!(%status, "received impersonation response");
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::impersonation_status(url, status, body));
    }

    let token_response = response
        .json::<GenerateAccessTokenResponse>()
        .await
        .map_err(|e| Error::impersonation(url, e))?;
    if token_response.access_token.is_empty() {
        return Err(Error::impersonation(
            url,
            "the response does not contain an access token",
        ));
    }
    tracing::debug!(expire_time = ?token_response.expire_time, "impersonated access token issued");

    Ok(AccessToken {
        token: token_response.access_token,
        expire_time: token_response.expire_time,
    })
}
