//! Error surface shared by every backend.

use std::path::PathBuf;

/// Boxed error used by object store implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = CredentialsError> = std::result::Result<T, E>;

/// Everything that can go wrong while loading a credential bundle.
///
/// The `Invalid*` variants are raised before any I/O happens. `Read` and
/// `Fetch` wrap the backend failure, and `Decode` means the retrieved bytes
/// were not a JSON object.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("Config must be an object")]
    InvalidConfig,

    #[error("Config local must be an object")]
    InvalidLocalConfig,

    #[error("Local path must be a string")]
    InvalidLocalPath,

    #[error("Config s3 must be an object")]
    InvalidS3Config,

    #[error("S3 apiVersion must be a string")]
    InvalidS3ApiVersion,

    #[error("S3 bucket must be a string")]
    InvalidS3Bucket,

    #[error("S3 key must be a string")]
    InvalidS3Key,

    #[error("Failed to read credentials file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch credentials from s3://{bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Credentials are not a valid JSON object: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to load credentials config {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },
}

/// Fieldless discriminant of [`CredentialsError`], handy for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfig,
    InvalidLocalConfig,
    InvalidLocalPath,
    InvalidS3Config,
    InvalidS3ApiVersion,
    InvalidS3Bucket,
    InvalidS3Key,
    Read,
    Fetch,
    Decode,
    ConfigFile,
}

impl CredentialsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig => ErrorKind::InvalidConfig,
            Self::InvalidLocalConfig => ErrorKind::InvalidLocalConfig,
            Self::InvalidLocalPath => ErrorKind::InvalidLocalPath,
            Self::InvalidS3Config => ErrorKind::InvalidS3Config,
            Self::InvalidS3ApiVersion => ErrorKind::InvalidS3ApiVersion,
            Self::InvalidS3Bucket => ErrorKind::InvalidS3Bucket,
            Self::InvalidS3Key => ErrorKind::InvalidS3Key,
            Self::Read { .. } => ErrorKind::Read,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Decode(_) => ErrorKind::Decode,
            Self::ConfigFile { .. } => ErrorKind::ConfigFile,
        }
    }

    /// True for errors detected while validating configuration, before any I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidConfig
                | ErrorKind::InvalidLocalConfig
                | ErrorKind::InvalidLocalPath
                | ErrorKind::InvalidS3Config
                | ErrorKind::InvalidS3ApiVersion
                | ErrorKind::InvalidS3Bucket
                | ErrorKind::InvalidS3Key
                | ErrorKind::ConfigFile
        )
    }
}
