//! Loader configuration.
//!
//! A load call receives an untyped JSON value shaped like:
//!
//! ```json
//! {
//!   "source": "s3",
//!   "debug": true,
//!   "local": { "path": "credentials.json" },
//!   "s3": { "apiVersion": "2006-03-01", "bucket": "my-bucket", "key": "credentials.json" }
//! }
//! ```
//!
//! [`SourceConfig::from_value`] parses that value into a typed source once, at
//! the boundary, and reports the first rule it violates.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diagnostics::DiagnosticSink;
use crate::error::{CredentialsError, Result};

/// Which backend a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    S3,
}

impl BackendKind {
    /// Pick a backend from the `source` discriminator.
    ///
    /// Only a case-insensitive `"s3"` selects S3. Anything else, including a
    /// missing or non-string value, falls back to the local file backend.
    pub fn select(source: Option<&Value>) -> Self {
        match source.and_then(Value::as_str) {
            Some(source) if source.eq_ignore_ascii_case("s3") => BackendKind::S3,
            _ => BackendKind::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::S3 => "s3",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the local file backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Path of the JSON credentials file.
    pub path: PathBuf,
}

impl LocalConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn from_value(value: Option<&Value>) -> Result<Self> {
        let local = value
            .and_then(Value::as_object)
            .ok_or(CredentialsError::InvalidLocalConfig)?;
        let path = required_str(local, "path", CredentialsError::InvalidLocalPath)?;

        Ok(Self::new(path))
    }
}

/// Settings for the S3 backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    pub api_version: String,
    pub bucket: String,
    pub key: String,

    /// Region override. Defaults to the AWS environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint override for S3-compatible stores (MinIO, localstack).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_path_style: Option<bool>,
}

impl S3Config {
    pub fn new(
        api_version: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            bucket: bucket.into(),
            key: key.into(),
            region: None,
            endpoint: None,
            force_path_style: None,
        }
    }

    fn from_value(value: Option<&Value>) -> Result<Self> {
        let s3 = value
            .and_then(Value::as_object)
            .ok_or(CredentialsError::InvalidS3Config)?;

        let api_version = required_str(s3, "apiVersion", CredentialsError::InvalidS3ApiVersion)?;
        let bucket = required_str(s3, "bucket", CredentialsError::InvalidS3Bucket)?;
        let key = required_str(s3, "key", CredentialsError::InvalidS3Key)?;

        Ok(Self {
            api_version,
            bucket,
            key,
            region: optional_str(s3, "region"),
            endpoint: optional_str(s3, "endpoint"),
            force_path_style: s3.get("forcePathStyle").and_then(Value::as_bool),
        })
    }
}

/// A validated credential source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceConfig {
    Local { local: LocalConfig },
    S3 { s3: S3Config },
}

impl SourceConfig {
    /// Validate a raw configuration value and select its backend.
    ///
    /// Rules are checked in order and the first failure is returned. Fields
    /// of the backend that was not selected are never looked at.
    pub fn from_value(value: &Value) -> Result<Self> {
        let config = value.as_object().ok_or(CredentialsError::InvalidConfig)?;

        match BackendKind::select(config.get("source")) {
            BackendKind::S3 => Ok(SourceConfig::S3 {
                s3: S3Config::from_value(config.get("s3"))?,
            }),
            BackendKind::Local => Ok(SourceConfig::Local {
                local: LocalConfig::from_value(config.get("local"))?,
            }),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            SourceConfig::Local { .. } => BackendKind::Local,
            SourceConfig::S3 { .. } => BackendKind::S3,
        }
    }
}

impl From<LocalConfig> for SourceConfig {
    fn from(local: LocalConfig) -> Self {
        SourceConfig::Local { local }
    }
}

impl From<S3Config> for SourceConfig {
    fn from(s3: S3Config) -> Self {
        SourceConfig::S3 { s3 }
    }
}

fn required_str(
    object: &Map<String, Value>,
    field: &str,
    error: CredentialsError,
) -> Result<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(error)
}

fn optional_str(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Input to a single load call: the raw configuration plus an optional
/// diagnostic callback.
#[derive(Clone)]
pub struct LoadConfig {
    value: Value,
    sink: Option<DiagnosticSink>,
}

impl LoadConfig {
    pub fn new(value: Value) -> Self {
        Self { value, sink: None }
    }

    /// Route diagnostic messages to `sink` from this load on.
    pub fn debug_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sink = Some(DiagnosticSink::from_fn(sink));
        self
    }

    /// Load configuration from a TOML file with the same shape as the JSON
    /// form (`source`, `debug`, `[local]`, `[s3]`).
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let config_error = |message: String| CredentialsError::ConfigFile {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|err| config_error(err.to_string()))?;
        let value: Value = toml::from_str(&content).map_err(|err| config_error(err.to_string()))?;

        Ok(Self::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The sink this configuration asks the loader to install, if any.
    ///
    /// An explicit callback wins over `debug: true`. `debug: false` and
    /// other values leave the current sink alone.
    pub(crate) fn requested_sink(&self) -> Option<DiagnosticSink> {
        if let Some(sink) = &self.sink {
            return Some(sink.clone());
        }

        match self.value.get("debug") {
            Some(Value::Bool(true)) => Some(DiagnosticSink::tracing()),
            _ => None,
        }
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("value", &self.value)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl From<Value> for LoadConfig {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<&Value> for LoadConfig {
    fn from(value: &Value) -> Self {
        Self::new(value.clone())
    }
}
