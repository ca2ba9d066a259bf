//! Credential backends.
//!
//! Each backend turns a validated source configuration into raw bytes. None
//! of them interpret the bytes; decoding happens in the loader.

mod local;
mod s3;

pub use local::LocalFileReader;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;
#[cfg(not(feature = "s3"))]
pub use s3::UnavailableObjectStore;
pub use s3::{default_object_store, ObjectStore, ObjectStoreReader, S3_API_VERSION};

use std::sync::Arc;

use crate::config::{BackendKind, SourceConfig};
use crate::error::Result;

/// The backend selected for one load.
#[derive(Debug, Clone)]
pub enum Backend {
    Local(LocalFileReader),
    ObjectStore(ObjectStoreReader),
}

impl Backend {
    /// Build the backend for `source`. `store` is only used by S3 sources.
    pub fn for_source(source: &SourceConfig, store: Arc<dyn ObjectStore>) -> Self {
        match source {
            SourceConfig::Local { local } => Backend::Local(LocalFileReader::new(local.clone())),
            SourceConfig::S3 { s3 } => {
                Backend::ObjectStore(ObjectStoreReader::new(s3.clone(), store))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Local(_) => BackendKind::Local,
            Backend::ObjectStore(_) => BackendKind::S3,
        }
    }

    /// Human-readable location, used in diagnostics.
    pub fn location(&self) -> String {
        match self {
            Backend::Local(reader) => reader.path().display().to_string(),
            Backend::ObjectStore(reader) => format!("{}/{}", reader.bucket(), reader.key()),
        }
    }

    pub async fn fetch_raw(&self) -> Result<Vec<u8>> {
        match self {
            Backend::Local(reader) => reader.fetch_raw().await,
            Backend::ObjectStore(reader) => reader.fetch_raw().await,
        }
    }
}
