//! S3 object store backend.
//!
//! The actual transfer is behind the [`ObjectStore`] trait so callers and
//! tests can swap in their own store. [`S3ObjectStore`] is the AWS SDK
//! implementation, available with the `s3` feature.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::S3Config;
use crate::error::{BoxError, CredentialsError, Result};

/// The only API version S3 has ever published.
pub const S3_API_VERSION: &str = "2006-03-01";

/// Fetches one object by bucket and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Return the full object body named by `location.bucket` and
    /// `location.key`.
    async fn get_object(&self, location: &S3Config) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Reads the credentials object named by an [`S3Config`] from an
/// [`ObjectStore`].
#[derive(Clone)]
pub struct ObjectStoreReader {
    config: S3Config,
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreReader {
    pub fn new(config: S3Config, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    /// Fetch the object in a single attempt.
    pub async fn fetch_raw(&self) -> Result<Vec<u8>> {
        self.store
            .get_object(&self.config)
            .await
            .map_err(|source| CredentialsError::Fetch {
                bucket: self.config.bucket.clone(),
                key: self.config.key.clone(),
                source,
            })
    }
}

impl std::fmt::Debug for ObjectStoreReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreReader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The object store used when a loader is not given one explicitly.
pub fn default_object_store() -> Arc<dyn ObjectStore> {
    #[cfg(feature = "s3")]
    {
        Arc::new(S3ObjectStore::from_env())
    }
    #[cfg(not(feature = "s3"))]
    {
        Arc::new(UnavailableObjectStore)
    }
}

/// Stand-in store for builds without the `s3` feature.
#[cfg(not(feature = "s3"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableObjectStore;

#[cfg(not(feature = "s3"))]
#[async_trait]
impl ObjectStore for UnavailableObjectStore {
    async fn get_object(&self, _location: &S3Config) -> std::result::Result<Vec<u8>, BoxError> {
        Err("S3 support is not compiled in (enable the `s3` feature)".into())
    }
}

#[cfg(feature = "s3")]
pub use sdk::S3ObjectStore;

#[cfg(feature = "s3")]
mod sdk {
    use async_trait::async_trait;
    use aws_config::{BehaviorVersion, Region};
    use aws_sdk_s3::error::DisplayErrorContext;
    use aws_sdk_s3::Client;

    use super::{ObjectStore, S3_API_VERSION};
    use crate::config::S3Config;
    use crate::error::BoxError;

    /// [`ObjectStore`] backed by the AWS SDK.
    ///
    /// Unless built with [`with_client`](Self::with_client), a client is
    /// created for every fetch from the ambient AWS environment (credentials
    /// chain, `AWS_REGION`, ...) with the region, endpoint and path-style
    /// overrides of the requested [`S3Config`] applied on top.
    #[derive(Debug, Clone, Default)]
    pub struct S3ObjectStore {
        client: Option<Client>,
    }

    impl S3ObjectStore {
        pub fn from_env() -> Self {
            Self { client: None }
        }

        /// Use a preconfigured client for every fetch. Per-request region and
        /// endpoint overrides are ignored in this mode.
        pub fn with_client(client: Client) -> Self {
            Self {
                client: Some(client),
            }
        }

        async fn client_for(&self, location: &S3Config) -> Client {
            if let Some(client) = &self.client {
                return client.clone();
            }

            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = &location.region {
                loader = loader.region(Region::new(region.clone()));
            }
            let sdk_config = loader.load().await;

            let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
            if let Some(endpoint) = &location.endpoint {
                builder = builder.endpoint_url(endpoint.as_str());
            }
            if let Some(force_path_style) = location.force_path_style {
                builder = builder.force_path_style(force_path_style);
            }

            Client::from_conf(builder.build())
        }
    }

    #[async_trait]
    impl ObjectStore for S3ObjectStore {
        async fn get_object(&self, location: &S3Config) -> Result<Vec<u8>, BoxError> {
            if location.api_version != S3_API_VERSION {
                tracing::warn!(
                    api_version = %location.api_version,
                    "Unknown S3 API version, using {S3_API_VERSION}"
                );
            }

            let client = self.client_for(location).await;
            let response = client
                .get_object()
                .bucket(&location.bucket)
                .key(&location.key)
                .send()
                .await
                .map_err(|err| {
                    tracing::debug!(
                        bucket = %location.bucket,
                        key = %location.key,
                        error = %DisplayErrorContext(&err),
                        "S3 GetObject failed"
                    );
                    err
                })?;

            let body = response.body.collect().await?;
            Ok(body.into_bytes().to_vec())
        }
    }
}
