//! Local file backend.

use std::path::Path;

use crate::config::LocalConfig;
use crate::error::{CredentialsError, Result};

/// Reads the credentials file named by a [`LocalConfig`].
#[derive(Debug, Clone)]
pub struct LocalFileReader {
    config: LocalConfig,
}

impl LocalFileReader {
    pub fn new(config: LocalConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read the whole file in one attempt. The handle is closed once the
    /// read finishes, successfully or not.
    pub async fn fetch_raw(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.config.path)
            .await
            .map_err(|source| CredentialsError::Read {
                path: self.config.path.clone(),
                source,
            })
    }
}
