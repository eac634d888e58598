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

//! Errors returned by the plugin.
//!
//! Every error is terminal for the invocation. The predicates on [Error] tell
//! the caller which step failed, and the `Display` output names the field,
//! endpoint, or path involved.

use http::StatusCode;
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for all plugin operations.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

/// The required configuration fields.
///
/// Each variant identifies one field that must be set before any network
/// call is attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingField {
    OidcToken,
    ProjectId,
    PoolId,
    ProviderId,
    ServiceAccountEmail,
}

impl MissingField {
    /// The name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OidcToken => "oidc-token",
            Self::ProjectId => "project-id",
            Self::PoolId => "pool-id",
            Self::ProviderId => "provider-id",
            Self::ServiceAccountEmail => "service-account-email",
        }
    }
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Error {
    /// A required configuration field was absent or empty.
    pub fn is_configuration(&self) -> bool {
        matches!(self.0, ErrorKind::Configuration(_))
    }

    /// The field reported by a configuration error.
    pub fn missing_field(&self) -> Option<MissingField> {
        match &self.0 {
            ErrorKind::Configuration(field) => Some(*field),
            _ => None,
        }
    }

    /// The STS token exchange failed.
    pub fn is_exchange(&self) -> bool {
        matches!(
            self.0,
            ErrorKind::Exchange { .. } | ErrorKind::ExchangeStatus { .. }
        )
    }

    /// The service account impersonation failed.
    pub fn is_impersonation(&self) -> bool {
        matches!(
            self.0,
            ErrorKind::Impersonation { .. } | ErrorKind::ImpersonationStatus { .. }
        )
    }

    /// Creating a directory or writing a credentials file failed.
    pub fn is_file_system(&self) -> bool {
        matches!(self.0, ErrorKind::FileSystem { .. })
    }

    /// Publishing to an output destination failed.
    pub fn is_write(&self) -> bool {
        matches!(self.0, ErrorKind::Write { .. })
    }

    /// The invocation was interrupted before it completed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.0, ErrorKind::Cancelled)
    }

    /// The HTTP status returned by the upstream service, if any.
    pub fn http_status_code(&self) -> Option<StatusCode> {
        match &self.0 {
            ErrorKind::ExchangeStatus { status, .. }
            | ErrorKind::ImpersonationStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The file involved in a file system error.
    pub fn path(&self) -> Option<&Path> {
        match &self.0 {
            ErrorKind::FileSystem { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }

    /// Creates an error reporting the cancellation of the invocation.
    pub fn cancelled() -> Error {
        Error(ErrorKind::Cancelled)
    }

    pub(crate) fn missing(field: MissingField) -> Error {
        Error(ErrorKind::Configuration(field))
    }

    pub(crate) fn exchange<T>(url: &str, source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Exchange {
            url: url.to_string(),
            source: source.into(),
        })
    }

    pub(crate) fn exchange_status(url: &str, status: StatusCode, body: String) -> Error {
        Error(ErrorKind::ExchangeStatus {
            url: url.to_string(),
            status,
            body,
        })
    }

    pub(crate) fn impersonation<T>(url: &str, source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Impersonation {
            url: url.to_string(),
            source: source.into(),
        })
    }

    pub(crate) fn impersonation_status(url: &str, status: StatusCode, body: String) -> Error {
        Error(ErrorKind::ImpersonationStatus {
            url: url.to_string(),
            status,
            body,
        })
    }

    pub(crate) fn file_system<P, T>(path: P, source: T) -> Error
    where
        P: Into<PathBuf>,
        T: Into<BoxError>,
    {
        Error(ErrorKind::FileSystem {
            path: path.into(),
            source: source.into(),
        })
    }

    pub(crate) fn write<T>(destination: String, source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Write {
            destination,
            source: source.into(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("{0} is not provided")]
    Configuration(MissingField),
    #[error("cannot exchange the OIDC token at {url}: {source}")]
    Exchange {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("cannot exchange the OIDC token at {url}, failed with status {status}: {body}")]
    ExchangeStatus {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("cannot impersonate the service account at {url}: {source}")]
    Impersonation {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("cannot impersonate the service account at {url}, failed with status {status}: {body}")]
    ImpersonationStatus {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("cannot write {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("cannot write to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: BoxError,
    },
    #[error("the invocation was cancelled")]
    Cancelled,
}
