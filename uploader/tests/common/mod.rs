// Not every helper is used in every test, so we allow dead code
#![allow(unused_imports, dead_code)]

use std::io::Write;
use std::sync::Arc;

use image_uploader::{
    credentials::mock::MockCredentialBroker,
    media_storage::mock::MockObjectStore,
    types::UploadConfig,
    upload::{FixedClock, SelectedFile, UploadClient},
    view::mock::RecordingView,
};
use tempfile::{NamedTempFile, TempDir};

pub const INPUT_BUCKET: &str = "serverless-image-processing-input-aa42ab4a";
pub const OUTPUT_BUCKET: &str = "serverless-image-processing-output-aa42ab4a";
pub const UPLOAD_MILLIS: i64 = 1_700_000_000_000;

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Writes `contents` to `name` inside a fresh temporary directory
pub fn write_image(name: &str, contents: &[u8]) -> (TempDir, SelectedFile) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create image file");
    file.write_all(contents).expect("Failed to write image file");

    let selected = SelectedFile::from_path(&path).expect("File name should be valid UTF-8");
    (dir, selected)
}

/// Upload client wired to recording mocks
pub struct TestContext {
    pub client: UploadClient,
    pub broker: Arc<MockCredentialBroker>,
    pub store: Arc<MockObjectStore>,
    pub view: Arc<RecordingView>,
}

impl TestContext {
    pub fn new(broker: MockCredentialBroker, store: MockObjectStore) -> Self {
        setup_test_env();

        let broker = Arc::new(broker);
        let store = Arc::new(store);
        let view = Arc::new(RecordingView::new());

        let client = UploadClient::new(
            UploadConfig::new("us-east-1", "us-east-1:test-pool", INPUT_BUCKET),
            broker.clone(),
            store.clone(),
            view.clone(),
        )
        .with_clock(Arc::new(FixedClock(UPLOAD_MILLIS)));

        Self {
            client,
            broker,
            store,
            view,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(
            MockCredentialBroker::succeeding(),
            MockObjectStore::succeeding(),
        )
    }
}
