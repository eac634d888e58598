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

//! Materializes [Application Default Credentials] for workload identity
//! federation.
//!
//! Instead of exchanging the OIDC token itself, the plugin can persist the
//! token and write an [external account configuration] that points at it.
//! Google client libraries that later load the file perform the STS exchange
//! and the impersonation on their own. The file does not carry scopes, the
//! consuming application configures them.
//!
//! Neither the pool nor the service account are validated here, any problem
//! with them surfaces when the file is used.
//!
//! [Application Default Credentials]: https://cloud.google.com/docs/authentication/application-default-credentials
//! [external account configuration]: https://google.aip.dev/auth/4117#configuration-file-generation-and-usage

use crate::Result;
use crate::config::ExchangeRequest;
use crate::constants::{
    ADC_DIR, ADC_FILE, DEFAULT_WORKSPACE, EXTERNAL_ACCOUNT_TYPE, IAM_CREDENTIALS_ENDPOINT,
    ID_TOKEN_DIR, ID_TOKEN_FILE, ID_TOKEN_TYPE, STS_TOKEN_URL,
};
use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// A representation of an `external_account` credentials file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExternalAccountCredential {
    #[serde(rename = "type")]
    pub credential_type: String,
    pub audience: String,
    pub subject_token_type: String,
    pub token_url: String,
    pub service_account_impersonation_url: String,
    pub credential_source: FileCredentialSource,
}

/// A file-sourced subject token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileCredentialSource {
    pub file: PathBuf,
}

impl ExternalAccountCredential {
    /// Creates the credential for `request`, reading the subject token from
    /// `id_token_path`.
    pub fn new(request: &ExchangeRequest, id_token_path: PathBuf) -> Self {
        Self {
            credential_type: EXTERNAL_ACCOUNT_TYPE.to_string(),
            audience: request.audience(),
            subject_token_type: ID_TOKEN_TYPE.to_string(),
            token_url: STS_TOKEN_URL.to_string(),
            service_account_impersonation_url: crate::constants::impersonation_url(
                IAM_CREDENTIALS_ENDPOINT,
                &request.service_account_email,
            ),
            credential_source: FileCredentialSource {
                file: id_token_path,
            },
        }
    }
}

/// Writes the subject token and the credentials file under a workspace.
#[derive(Clone, Debug)]
pub struct Materializer {
    workspace: PathBuf,
}

impl Materializer {
    /// Creates a materializer rooted at `workspace`.
    ///
    /// A missing, empty, or root (`/`) workspace means the CI runner did not
    /// provide a usable directory, the materializer uses
    /// [DEFAULT_WORKSPACE] instead.
    pub fn new(workspace: Option<PathBuf>) -> Self {
        let workspace = match workspace {
            Some(w) if !w.as_os_str().is_empty() && w != Path::new("/") => w,
            _ => {
                tracing::warn!(
                    "could not get the workspace directory, using {DEFAULT_WORKSPACE} instead"
                );
                PathBuf::from(DEFAULT_WORKSPACE)
            }
        };
        Self { workspace }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// The location of the persisted OIDC token.
    pub fn id_token_path(&self) -> PathBuf {
        self.workspace.join(ID_TOKEN_DIR).join(ID_TOKEN_FILE)
    }

    /// The location of the credentials file.
    pub fn credentials_path(&self) -> PathBuf {
        self.workspace.join(ADC_DIR).join(ADC_FILE)
    }

    /// Writes the OIDC token and the credentials file, returning the path of
    /// the latter.
    ///
    /// Missing directories are created. Nothing is cleaned up on failure, a
    /// token written before a later error remains on disk.
    pub async fn materialize(&self, request: &ExchangeRequest) -> Result<PathBuf> {
        let id_token_path = self.id_token_path();
        create_parent(&id_token_path).await?;
        write_file(&id_token_path, request.oidc_token.as_bytes()).await?;
        tracing::debug!(path = %id_token_path.display(), "OIDC token written");

        let credentials_path = self.credentials_path();
        create_parent(&credentials_path).await?;
        let credential = ExternalAccountCredential::new(request, id_token_path);
        let contents = serde_json::to_vec_pretty(&credential)
            .map_err(|e| Error::file_system(&credentials_path, e))?;
        write_file(&credentials_path, &contents).await?;

        Ok(credentials_path)
    }
}

async fn create_parent(path: &Path) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder
        .create(dir)
        .await
        .map_err(|e| Error::file_system(dir, e))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);
    let mut file = options
        .open(path)
        .await
        .map_err(|e| Error::file_system(path, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| Error::file_system(path, e))?;
    file.flush().await.map_err(|e| Error::file_system(path, e))
}
