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

//! Bearer tokens produced by the exchange.
//!
//! Neither token type tracks its expiration; both are forwarded as-is and
//! dropped once published. Their `Debug` output never includes the secret.

/// The token returned by the Security Token Service.
///
/// It represents the external identity inside Google's trust domain and is
/// only used to authenticate the impersonation request.
#[derive(Clone, PartialEq)]
pub struct FederatedToken {
    pub(crate) token: String,
    pub(crate) token_type: String,
}

impl FederatedToken {
    /// The value used in the `Authorization:` header.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// The type of the token, typically `"Bearer"`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

impl std::fmt::Debug for FederatedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederatedToken")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// A short-lived access token for the impersonated service account.
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    pub(crate) token: String,
    /// The expiration reported by IAM, in RFC 3339 format.
    pub(crate) expire_time: Option<String>,
}

impl AccessToken {
    /// The access token value.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// The expiration time reported by the IAM Credentials API, if any.
    pub fn expire_time(&self) -> Option<&str> {
        self.expire_time.as_deref()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[censored]")
            .field("expire_time", &self.expire_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn federated_debug() {
        let token = FederatedToken {
            token: "token-test-only".into(),
            token_type: "Bearer".into(),
        };
        let got = format!("{token:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        assert!(got.contains("token: \"[censored]\""), "{got}");
        assert!(got.contains("token_type: \"Bearer\""), "{got}");
        assert_eq!(token.secret(), "token-test-only");
    }

    #[test]
    fn access_debug() {
        let token = AccessToken {
            token: "token-test-only".into(),
            expire_time: Some("2025-01-01T00:00:00Z".into()),
        };
        let got = format!("{token:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        assert!(got.contains("token: \"[censored]\""), "{got}");
        assert!(got.contains("2025-01-01T00:00:00Z"), "{got}");
        assert_eq!(token.secret(), "token-test-only");
        assert_eq!(token.expire_time(), Some("2025-01-01T00:00:00Z"));
    }
}
