//! S3-based image storage operations
mod error;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use tracing::{debug, error, info};

use crate::credentials::Credentials;
use crate::types::Environment;

pub use error::{BucketError, BucketResult};

/// Object to be written to the input bucket
#[derive(Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Destination bucket
    pub bucket_name: String,
    /// Key the bytes are stored under
    pub object_key: String,
    /// Declared content type of the payload
    pub content_type: String,
    /// Payload
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTarget")
            .field("bucket_name", &self.bucket_name)
            .field("object_key", &self.object_key)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Destination for uploaded objects
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes the target's bytes under its key, signed with `credentials`
    async fn put_object(&self, target: UploadTarget, credentials: &Credentials)
        -> BucketResult<()>;
}

/// Object store client for S3 operations
///
/// A fresh S3 client is built for every put so each upload is signed with the
/// credentials resolved for that attempt only.
pub struct MediaStorage {
    environment: Environment,
    sdk_config: aws_config::SdkConfig,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `environment` - Deployment stage, used for endpoint overrides
    /// * `sdk_config` - Shared AWS configuration carrying region and retry policy
    #[must_use]
    pub const fn new(environment: Environment, sdk_config: aws_config::SdkConfig) -> Self {
        Self {
            environment,
            sdk_config,
        }
    }

    fn client_for(&self, credentials: &Credentials) -> S3Client {
        S3Client::from_conf(
            self.environment
                .s3_client_config(&self.sdk_config, credentials.into()),
        )
    }
}

#[async_trait::async_trait]
impl ObjectStore for MediaStorage {
    async fn put_object(
        &self,
        target: UploadTarget,
        credentials: &Credentials,
    ) -> BucketResult<()> {
        debug!(
            "Putting object {} ({} bytes, {}) into bucket {}",
            target.object_key,
            target.bytes.len(),
            target.content_type,
            target.bucket_name
        );

        let UploadTarget {
            bucket_name,
            object_key,
            content_type,
            bytes,
        } = target;

        self.client_for(credentials)
            .put_object()
            .bucket(&bucket_name)
            .key(&object_key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to put object {object_key} into {bucket_name}: {e}");
                BucketError::from(e)
            })?;

        info!("Stored object {object_key} in bucket {bucket_name}");
        Ok(())
    }
}

/// Test doubles for object storage
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{Arc, Mutex, PoisonError};

    use tokio::sync::Notify;

    use super::{BucketError, BucketResult, Credentials, ObjectStore, UploadTarget};

    /// Store that records every put, optionally failing or waiting on a gate
    pub struct MockObjectStore {
        fail: bool,
        gate: Option<Arc<Notify>>,
        puts: Mutex<Vec<UploadTarget>>,
    }

    impl MockObjectStore {
        /// Store accepting every put
        #[must_use]
        pub const fn succeeding() -> Self {
            Self {
                fail: false,
                gate: None,
                puts: Mutex::new(Vec::new()),
            }
        }

        /// Store rejecting every put with an access-denied error
        #[must_use]
        pub const fn failing() -> Self {
            Self {
                fail: true,
                gate: None,
                puts: Mutex::new(Vec::new()),
            }
        }

        /// Store whose puts block until the returned gate is notified
        #[must_use]
        pub fn gated() -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            let store = Self {
                fail: false,
                gate: Some(gate.clone()),
                puts: Mutex::new(Vec::new()),
            };
            (store, gate)
        }

        /// Every target received so far, in call order
        #[must_use]
        pub fn puts(&self) -> Vec<UploadTarget> {
            self.puts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for MockObjectStore {
        async fn put_object(
            &self,
            target: UploadTarget,
            _credentials: &Credentials,
        ) -> BucketResult<()> {
            self.puts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(target);

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            if self.fail {
                return Err(BucketError::S3Error("AccessDenied".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_omits_payload() {
        let target = UploadTarget {
            bucket_name: "photos-input".to_string(),
            object_key: "1-a.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let rendered = format!("{target:?}");
        assert!(rendered.contains("len: 4"));
        assert!(!rendered.contains("137"));
    }
}
