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

//! Exchanges the CI-issued OIDC token for a federated token.
//!
//! Reference: https://datatracker.ietf.org/doc/html/rfc8693

use crate::Result;
use crate::constants::{ACCESS_TOKEN_TYPE, TOKEN_EXCHANGE_GRANT_TYPE};
use crate::errors::Error;
use crate::token::FederatedToken;
use serde::Deserialize;

/// Handles the OAuth2 Secure Token Service (STS) exchange.
#[derive(Clone, Debug)]
pub struct STSHandler {
    client: reqwest::Client,
}

impl STSHandler {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Performs an oauth2 token exchange with the provided
    /// [ExchangeTokenRequest] information.
    ///
    /// Each call sends exactly one request. Nothing is cached and failures
    /// are not retried.
    pub async fn exchange_token(&self, req: ExchangeTokenRequest) -> Result<FederatedToken> {
        let params = [
            ("grant_type", TOKEN_EXCHANGE_GRANT_TYPE),
            ("requested_token_type", ACCESS_TOKEN_TYPE),
            ("subject_token_type", req.subject_token_type.as_str()),
            ("subject_token", req.subject_token.as_str()),
            ("audience", req.audience.as_str()),
            ("scope", req.scope.as_str()),
        ];
        tracing::debug!(url = %req.url, audience = %req.audience, "requesting federated token");

        let response = self
            .client
            .post(&req.url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::exchange(&req.url, e))?;

        let status = response.status();
        tracing::debug!(%status, "received token exchange response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::exchange_status(&req.url, status, body));
        }

        let token_res = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::exchange(&req.url, e))?;
        if token_res.access_token.is_empty() {
            return Err(Error::exchange(
                &req.url,
                "the response does not contain an access token",
            ));
        }
        Ok(FederatedToken {
            token: token_res.access_token,
            token_type: token_res.token_type,
        })
    }
}

/// Information required to perform an oauth2 token exchange with the
/// provided endpoint.
#[derive(Clone, PartialEq)]
pub struct ExchangeTokenRequest {
    pub url: String,
    pub subject_token: String,
    pub subject_token_type: String,
    pub audience: String,
    pub scope: String,
}

impl std::fmt::Debug for ExchangeTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeTokenRequest")
            .field("url", &self.url)
            .field("subject_token", &"[censored]")
            .field("subject_token_type", &self.subject_token_type)
            .field("audience", &self.audience)
            .field("scope", &self.scope)
            .finish()
    }
}

/// TokenResponse is used to decode the remote server response during
/// an oauth2 token exchange.
#[derive(Deserialize, Default, PartialEq, Debug)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
