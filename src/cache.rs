//! Single-slot in-memory cache for the last loaded bundle.

use std::sync::{Arc, PoisonError, RwLock};

use crate::bundle::CredentialBundle;

/// Holds at most one bundle.
///
/// `None` means nothing has been loaded since creation or the last
/// [`clear`](Self::clear). Replacing the slot swaps the whole `Arc`, so
/// readers see either the old bundle or the new one, never a mix.
#[derive(Debug, Default)]
pub struct CredentialCache {
    slot: RwLock<Option<Arc<CredentialBundle>>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached bundle, if one has been loaded.
    pub fn cached(&self) -> Option<Arc<CredentialBundle>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cached bundle, or an empty one if nothing is loaded.
    pub fn current(&self) -> Arc<CredentialBundle> {
        self.cached().unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the slot contents. Old keys are not merged in.
    pub fn replace(&self, bundle: Arc<CredentialBundle>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(bundle);
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
