//! Load a JSON credential bundle from a local file or S3 and keep it in
//! memory.
//!
//! ```no_run
//! # async fn run() -> Result<(), credentials_loader::CredentialsError> {
//! use credentials_loader::CredentialsLoader;
//! use serde_json::json;
//!
//! let loader = CredentialsLoader::new();
//! loader
//!     .load(json!({ "local": { "path": "credentials.json" } }), false)
//!     .await?;
//!
//! let database = loader.get_key("database");
//! # Ok(())
//! # }
//! ```
//!
//! The free functions [`load`], [`get`] and [`get_key`] share one
//! process-wide loader for callers that want a single global cache.

pub mod backend;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;

pub use backend::{Backend, LocalFileReader, ObjectStore, ObjectStoreReader};
#[cfg(feature = "s3")]
pub use backend::S3ObjectStore;
pub use bundle::CredentialBundle;
pub use cache::CredentialCache;
pub use config::{BackendKind, LoadConfig, LocalConfig, S3Config, SourceConfig};
pub use diagnostics::DiagnosticSink;
pub use error::{CredentialsError, ErrorKind, Result};
pub use loader::CredentialsLoader;

use std::sync::{Arc, OnceLock};

use serde_json::Value;

static DEFAULT_LOADER: OnceLock<CredentialsLoader> = OnceLock::new();

/// The process-wide loader behind [`load`], [`get`] and [`get_key`].
pub fn default_loader() -> &'static CredentialsLoader {
    DEFAULT_LOADER.get_or_init(CredentialsLoader::new)
}

/// [`CredentialsLoader::load`] on the process-wide loader.
pub async fn load(config: impl Into<LoadConfig>, reload: bool) -> Result<Arc<CredentialBundle>> {
    default_loader().load(config, reload).await
}

/// [`CredentialsLoader::get`] on the process-wide loader.
pub fn get() -> Arc<CredentialBundle> {
    default_loader().get()
}

/// [`CredentialsLoader::get_key`] on the process-wide loader.
pub fn get_key(key: &str) -> Option<Value> {
    default_loader().get_key(key)
}
