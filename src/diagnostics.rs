//! Replaceable sink for debug messages emitted while loading.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A callback receiving human-readable diagnostic messages.
///
/// Messages are purely observational. The loader never looks at what the
/// sink does with them.
#[derive(Clone)]
pub struct DiagnosticSink(Arc<dyn Fn(&str) + Send + Sync>);

impl DiagnosticSink {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Discards every message.
    pub fn noop() -> Self {
        Self::from_fn(|_| {})
    }

    /// Prints messages as `tracing` info events on the
    /// `credentials_loader::debug` target.
    ///
    /// This crate never installs a subscriber. Nothing is printed unless the
    /// host application sets one up (for example with `tracing-subscriber`)
    /// that enables that target at info level.
    pub fn tracing() -> Self {
        Self::from_fn(|message| {
            tracing::info!(target: "credentials_loader::debug", "{message}");
        })
    }

    /// Hand `message` to the sink. A panicking sink is contained here and
    /// never reaches the caller.
    pub fn emit(&self, message: &str) {
        let sink = &self.0;
        if panic::catch_unwind(AssertUnwindSafe(|| sink(message))).is_err() {
            tracing::warn!("Diagnostic sink panicked; message dropped");
        }
    }

    pub(crate) fn same_as(&self, other: &DiagnosticSink) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiagnosticSink(..)")
    }
}
