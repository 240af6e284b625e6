//! Upload flow: validate, authenticate, store, predict derivative links

mod clock;
mod error;
mod file;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::credentials::CredentialBroker;
use crate::links::{self, DerivedLinks};
use crate::media_storage::{ObjectStore, UploadTarget};
use crate::types::UploadConfig;
use crate::view::{UploadStatus, UploadView};

#[cfg(any(test, feature = "test-utils"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use error::{UploadError, UploadResult, ValidationError};
pub use file::{content_type_for, SelectedFile};

/// Builds the object key for an upload started at `timestamp_millis`
#[must_use]
pub fn object_key(timestamp_millis: i64, file_name: &str) -> String {
    format!("{timestamp_millis}-{file_name}")
}

/// Uploads selected images and reports progress through an [`UploadView`]
///
/// At most one upload runs at a time; the trigger is disabled for its
/// duration and concurrent calls are rejected.
pub struct UploadClient {
    config: UploadConfig,
    broker: Arc<dyn CredentialBroker>,
    store: Arc<dyn ObjectStore>,
    view: Arc<dyn UploadView>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<()>,
}

impl UploadClient {
    /// Creates a new upload client using the wall clock
    ///
    /// # Arguments
    ///
    /// * `config` - Region, identity pool and destination bucket
    /// * `broker` - Source of per-upload temporary credentials
    /// * `store` - Destination for the uploaded bytes
    /// * `view` - Status, alert and link display
    #[must_use]
    pub fn new(
        config: UploadConfig,
        broker: Arc<dyn CredentialBroker>,
        store: Arc<dyn ObjectStore>,
        view: Arc<dyn UploadView>,
    ) -> Self {
        Self {
            config,
            broker,
            store,
            view,
            clock: Arc::new(SystemClock),
            in_flight: Mutex::new(()),
        }
    }

    /// Replaces the clock used for object key timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configuration this client uploads with
    #[must_use]
    pub const fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Uploads the selected file and returns the predicted derivative links
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Validation` if nothing is selected or the file
    /// cannot be processed downstream
    /// Returns `UploadError::Auth` if credentials cannot be resolved
    /// Returns `UploadError::Upload` or `UploadError::FileRead` if the bytes
    /// cannot be stored
    /// Returns `UploadError::UploadInProgress` if another upload is running
    pub async fn upload(&self, file: Option<&SelectedFile>) -> UploadResult<DerivedLinks> {
        self.guarded(file, None).await
    }

    /// Like [`UploadClient::upload`], abandoning the attempt once `cancel`
    /// fires
    ///
    /// Cancellation only applies to an attempt this call started: a call
    /// rejected with `UploadInProgress` leaves the running upload's view
    /// state alone.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Cancelled` if the token fires first, otherwise
    /// whatever [`UploadClient::upload`] returns
    pub async fn upload_until_cancelled(
        &self,
        file: Option<&SelectedFile>,
        cancel: &CancellationToken,
    ) -> UploadResult<DerivedLinks> {
        self.guarded(file, Some(cancel)).await
    }

    async fn guarded(
        &self,
        file: Option<&SelectedFile>,
        cancel: Option<&CancellationToken>,
    ) -> UploadResult<DerivedLinks> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Upload requested while another upload is in flight");
            return Err(UploadError::UploadInProgress);
        };

        self.view.set_upload_enabled(false);
        let result = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                result = self.run(file) => result,
                () = cancel.cancelled() => Err(UploadError::Cancelled),
            },
            None => self.run(file).await,
        };
        self.view.set_upload_enabled(true);

        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    async fn run(&self, file: Option<&SelectedFile>) -> UploadResult<DerivedLinks> {
        let file = file.ok_or(ValidationError::NoFileSelected)?;

        if !file.is_processable() {
            return Err(ValidationError::UnsupportedFileType {
                file_name: file.name().to_string(),
            }
            .into());
        }

        // Size is checked from metadata first so oversize files are never buffered
        let size = file.size().await.map_err(UploadError::FileRead)?;
        self.check_size(size)?;

        let bytes = file.read().await.map_err(UploadError::FileRead)?;
        self.check_size(bytes.len() as u64)?;

        let object_key = object_key(self.clock.now_millis(), file.name());
        self.view.set_status(UploadStatus::Authenticating);
        info!("Starting upload of {} as {object_key}", file.name());

        let credentials = self.broker.resolve().await?;

        self.view.set_status(UploadStatus::Uploading);
        let target = UploadTarget {
            bucket_name: self.config.input_bucket.clone(),
            object_key,
            content_type: file.content_type().to_string(),
            bytes,
        };
        let object_key = target.object_key.clone();
        self.store.put_object(target, &credentials).await?;

        self.view.set_status(UploadStatus::Succeeded);
        let links = links::predict(&object_key, &self.config.input_bucket);
        debug!(
            "Predicted derivatives for {object_key}: {} and {}",
            links.resized_url, links.thumbnail_url
        );
        self.view.show_links(&links);

        Ok(links)
    }

    const fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.config.max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                limit: self.config.max_upload_bytes,
            });
        }
        Ok(())
    }

    fn report(&self, err: &UploadError) {
        match err {
            UploadError::Validation(validation) => {
                warn!("Upload rejected: {validation}");
                self.view.alert(&validation.to_string());
            }
            UploadError::UploadInProgress => {}
            _ => error!("Upload error: {err}"),
        }

        if let Some(status) = err.status() {
            self.view.set_status(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::credentials::mock::MockCredentialBroker;
    use crate::media_storage::mock::MockObjectStore;
    use crate::view::mock::RecordingView;

    fn client(
        broker: Arc<MockCredentialBroker>,
        store: Arc<MockObjectStore>,
        view: Arc<RecordingView>,
    ) -> UploadClient {
        UploadClient::new(
            UploadConfig::new("us-east-1", "us-east-1:pool", "photos-input"),
            broker,
            store,
            view,
        )
        .with_clock(Arc::new(FixedClock(42)))
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key(1_700_000_000_000, "cat.png"), "1700000000000-cat.png");
    }

    #[tokio::test]
    async fn test_upload_happy_path() {
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(b"jpeg-bytes").unwrap();
        let file = SelectedFile::new("dog.jpg", "image/jpeg", tmp.path());

        let broker = Arc::new(MockCredentialBroker::succeeding());
        let store = Arc::new(MockObjectStore::succeeding());
        let view = Arc::new(RecordingView::new());

        let links = client(broker, store.clone(), view.clone())
            .upload(Some(&file))
            .await
            .unwrap();

        assert_eq!(
            links.resized_url,
            "https://photos-output.s3.amazonaws.com/resized/42-dog.jpg"
        );
        let puts = store.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].bytes, b"jpeg-bytes");
        assert_eq!(view.links(), vec![links]);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let file = SelectedFile::new("gone.png", "image/png", "/nonexistent/gone.png");
        let broker = Arc::new(MockCredentialBroker::succeeding());
        let store = Arc::new(MockObjectStore::succeeding());
        let view = Arc::new(RecordingView::new());

        let err = client(broker.clone(), store.clone(), view.clone())
            .upload(Some(&file))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::FileRead(_)));
        assert_eq!(broker.calls(), 0);
        assert!(store.puts().is_empty());
        assert_eq!(view.statuses(), vec![UploadStatus::UploadFailed]);
    }
}
