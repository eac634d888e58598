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

//! Publishes `KEY=VALUE` records for later pipeline steps.
//!
//! Plain and secret values go to different files. Both files are shared with
//! other steps, records are only ever appended.

use crate::Result;
use crate::errors::Error;
use std::io::Write;
use std::path::PathBuf;

/// How a value is handled by the CI runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sensitivity {
    Plain,
    Secret,
}

/// One record written to an output destination.
#[derive(Clone, PartialEq)]
pub struct OutputRecord {
    pub key: String,
    pub value: String,
    pub sensitivity: Sensitivity,
}

impl OutputRecord {
    pub fn plain<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            sensitivity: Sensitivity::Plain,
        }
    }

    pub fn secret<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            sensitivity: Sensitivity::Secret,
        }
    }
}

impl std::fmt::Debug for OutputRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self.sensitivity {
            Sensitivity::Plain => self.value.as_str(),
            Sensitivity::Secret => "[censored]",
        };
        f.debug_struct("OutputRecord")
            .field("key", &self.key)
            .field("value", &value)
            .field("sensitivity", &self.sensitivity)
            .finish()
    }
}

/// The destinations for plain and secret records.
#[derive(Clone, Debug, Default)]
pub struct OutputSink {
    output_file: Option<PathBuf>,
    secret_output_file: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(output_file: Option<PathBuf>, secret_output_file: Option<PathBuf>) -> Self {
        Self {
            output_file: output_file.filter(|p| !p.as_os_str().is_empty()),
            secret_output_file: secret_output_file.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// Appends `record` as a single newline-terminated line.
    ///
    /// The destination is created if needed and never truncated. The file is
    /// closed before this function returns, on success or failure.
    pub fn publish(&self, record: &OutputRecord) -> Result<()> {
        let (name, path) = match record.sensitivity {
            Sensitivity::Plain => ("output file", self.output_file.as_ref()),
            Sensitivity::Secret => ("secret output file", self.secret_output_file.as_ref()),
        };
        let Some(path) = path else {
            return Err(Error::write(
                name.to_string(),
                "the destination is not configured",
            ));
        };
        let destination = || format!("{name} {}", path.display());

        let mut options = std::fs::OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o644);
        let mut file = options
            .open(path)
            .map_err(|e| Error::write(destination(), e))?;
        writeln!(file, "{}={}", record.key, record.value)
            .map_err(|e| Error::write(destination(), e))?;
        tracing::debug!(key = %record.key, destination = %destination(), "published output record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn publish_plain() -> TestResult {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("output.env");
        let secret = dir.path().join("secret.env");
        let sink = OutputSink::new(Some(output.clone()), Some(secret.clone()));

        sink.publish(&OutputRecord::plain("KEY", "value"))?;
        assert_eq!(std::fs::read_to_string(&output)?, "KEY=value\n");
        assert!(!secret.exists());
        Ok(())
    }

    #[test]
    fn publish_secret() -> TestResult {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("output.env");
        let secret = dir.path().join("secret.env");
        let sink = OutputSink::new(Some(output.clone()), Some(secret.clone()));

        sink.publish(&OutputRecord::secret("TOKEN", "s3cr3t"))?;
        assert_eq!(std::fs::read_to_string(&secret)?, "TOKEN=s3cr3t\n");
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn publish_appends() -> TestResult {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("output.env");
        std::fs::write(&output, "EXISTING=1\n")?;
        let sink = OutputSink::new(Some(output.clone()), None);

        sink.publish(&OutputRecord::plain("FIRST", "a"))?;
        sink.publish(&OutputRecord::plain("SECOND", "b"))?;
        assert_eq!(
            std::fs::read_to_string(&output)?,
            "EXISTING=1\nFIRST=a\nSECOND=b\n"
        );
        Ok(())
    }

    #[test_case(Sensitivity::Plain)]
    #[test_case(Sensitivity::Secret)]
    fn publish_unconfigured(sensitivity: Sensitivity) {
        let sink = OutputSink::new(None, Some(PathBuf::new()));
        let record = OutputRecord {
            key: "KEY".into(),
            value: "value".into(),
            sensitivity,
        };
        let err = sink.publish(&record).unwrap_err();
        assert!(err.is_write(), "{err:?}");
        assert!(err.to_string().contains("not configured"), "{err}");
    }

    #[test]
    fn publish_open_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("missing-dir").join("output.env");
        let sink = OutputSink::new(Some(output.clone()), None);

        let err = sink
            .publish(&OutputRecord::plain("KEY", "value"))
            .unwrap_err();
        assert!(err.is_write(), "{err:?}");
        assert!(
            err.to_string().contains(&output.display().to_string()),
            "{err}"
        );
        Ok(())
    }

    #[test]
    fn debug() {
        let got = format!("{:?}", OutputRecord::secret("TOKEN", "s3cr3t"));
        assert!(!got.contains("s3cr3t"), "{got}");
        assert!(got.contains("[censored]"), "{got}");

        let got = format!("{:?}", OutputRecord::plain("KEY", "visible"));
        assert!(got.contains("visible"), "{got}");
    }
}
