#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use credentials_loader::error::BoxError;
use credentials_loader::{ObjectStore, S3Config};
use serde_json::{json, Value};

pub const VALID_CREDENTIALS: &str =
    r#"{"version":1,"source":"local","database":{"username":"test","password":"test"}}"#;

pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

pub fn local_config(path: &Path) -> Value {
    json!({ "local": { "path": path } })
}

pub fn s3_config(bucket: &str, key: &str) -> Value {
    json!({
        "source": "s3",
        "s3": { "apiVersion": "2006-03-01", "bucket": bucket, "key": key }
    })
}

/// In-memory object store that counts fetches.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    fetches: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, body: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.as_bytes().to_vec());
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, location: &S3Config) -> Result<Vec<u8>, BoxError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(location.bucket.clone(), location.key.clone()))
            .cloned()
            .ok_or_else(|| format!("NoSuchKey: {}/{}", location.bucket, location.key).into())
    }
}
