//! The decoded credential document.

use std::fmt;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CredentialsError, Result};

/// A decoded credential bundle: string keys mapped to arbitrary JSON.
///
/// No schema is enforced beyond the top-level value being an object.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialBundle(Map<String, Value>);

impl CredentialBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode raw bytes as a JSON object.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw).map_err(CredentialsError::Decode)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Deserialize the value at `key` into `T`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.0
            .get(key)
            .map(|value| T::deserialize(value).map_err(CredentialsError::Decode))
            .transpose()
    }

    /// The string at `key` wrapped so it stays out of logs.
    pub fn secret(&self, key: &str) -> Option<SecretString> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(|value| SecretString::from(value.to_owned()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CredentialBundle {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<CredentialBundle> for Value {
    fn from(bundle: CredentialBundle) -> Self {
        Value::Object(bundle.0)
    }
}

// Values are secrets; only the key names are printed.
impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|key| (key, "[REDACTED]")))
            .finish()
    }
}
