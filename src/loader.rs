//! Load orchestration: validate, fetch, decode, cache.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::backend::{default_object_store, Backend, ObjectStore};
use crate::bundle::CredentialBundle;
use crate::cache::CredentialCache;
use crate::config::{LoadConfig, SourceConfig};
use crate::diagnostics::DiagnosticSink;
use crate::error::{CredentialsError, Result};

/// Loads a credential bundle from its configured source and keeps the last
/// one in memory.
///
/// Every loader owns its own cache slot and diagnostic sink, so independent
/// loaders never observe each other's state.
///
/// Concurrent loads are not coordinated. Two reloads in flight both fetch,
/// and whichever finishes last ends up in the cache.
pub struct CredentialsLoader {
    cache: CredentialCache,
    sink: RwLock<DiagnosticSink>,
    object_store: Arc<dyn ObjectStore>,
}

impl CredentialsLoader {
    /// Create a loader using the default object store for S3 sources.
    pub fn new() -> Self {
        Self::with_object_store(default_object_store())
    }

    /// Create a loader that fetches S3 sources through `object_store`.
    pub fn with_object_store(object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            cache: CredentialCache::new(),
            sink: RwLock::new(DiagnosticSink::noop()),
            object_store,
        }
    }

    /// Load the credential bundle described by `config`.
    ///
    /// Unless `reload` is set, a previously loaded bundle is returned as-is
    /// without validating `config` or touching any backend. On any failure
    /// the cache keeps whatever it held before.
    pub async fn load(
        &self,
        config: impl Into<LoadConfig>,
        reload: bool,
    ) -> Result<Arc<CredentialBundle>> {
        if let Some(bundle) = self.cache_hit(reload) {
            return Ok(bundle);
        }

        let config = config.into();
        if config.value().is_object() {
            if let Some(sink) = config.requested_sink() {
                self.set_diagnostic_sink(sink);
            }
        }

        let source =
            SourceConfig::from_value(config.value()).inspect_err(|err| self.report_failure(err))?;

        self.fetch_and_cache(&source).await
    }

    /// Like [`load`](Self::load), starting from an already validated source.
    pub async fn load_source(
        &self,
        source: &SourceConfig,
        reload: bool,
    ) -> Result<Arc<CredentialBundle>> {
        if let Some(bundle) = self.cache_hit(reload) {
            return Ok(bundle);
        }

        self.fetch_and_cache(source).await
    }

    /// The whole cached bundle. Empty if nothing has been loaded.
    pub fn get(&self) -> Arc<CredentialBundle> {
        self.cache.current()
    }

    /// The cached value at `key`.
    ///
    /// An empty key returns the whole bundle as a JSON object.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        let bundle = self.cache.current();
        if key.is_empty() {
            return Some(Value::Object(bundle.as_map().clone()));
        }

        bundle.get(key).cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Forget the cached bundle so the next load fetches again.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Replace the diagnostic sink for this loader.
    pub fn set_diagnostic_sink(&self, sink: DiagnosticSink) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    fn cache_hit(&self, reload: bool) -> Option<Arc<CredentialBundle>> {
        if reload {
            return None;
        }

        let bundle = self.cache.cached()?;
        tracing::debug!(keys = bundle.len(), "Using cached credentials");
        Some(bundle)
    }

    async fn fetch_and_cache(&self, source: &SourceConfig) -> Result<Arc<CredentialBundle>> {
        let backend = Backend::for_source(source, Arc::clone(&self.object_store));
        let location = backend.location();

        self.diagnose(&format!("Using {} credentials backend", backend.kind()));
        self.diagnose(&format!(
            "Retrieving credentials from {} ({location})...",
            backend.kind()
        ));
        tracing::debug!(backend = %backend.kind(), location = %location, "Fetching credentials");

        let raw = backend
            .fetch_raw()
            .await
            .inspect_err(|err| self.report_failure(err))?;

        let bundle = CredentialBundle::from_slice(&raw).inspect_err(|err| self.report_failure(err))?;
        let bundle = Arc::new(bundle);
        self.cache.replace(Arc::clone(&bundle));

        self.diagnose(&format!(
            "Loaded credentials from {} with {} keys",
            backend.kind(),
            bundle.len()
        ));
        tracing::debug!(backend = %backend.kind(), keys = bundle.len(), "Credentials loaded");

        Ok(bundle)
    }

    fn report_failure(&self, err: &CredentialsError) {
        tracing::warn!(error = %err, "Failed to load credentials");
        self.diagnose(&err.to_string());
    }

    pub(crate) fn diagnostic_sink(&self) -> DiagnosticSink {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn diagnose(&self, message: &str) {
        // Clone out of the lock so a sink may call back into the loader.
        self.diagnostic_sink().emit(message);
    }
}

impl Default for CredentialsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsLoader")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
