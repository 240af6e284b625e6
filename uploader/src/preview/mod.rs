//! Local preview of a selected image, independent of uploading

use std::io;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::upload::SelectedFile;
use crate::view::UploadView;

/// Renders bytes as a `data:` URL
#[must_use]
pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Reads selected files in the background and hands the rendered preview to
/// the view
pub struct PreviewController {
    view: Arc<dyn UploadView>,
}

impl PreviewController {
    /// Creates a controller rendering into `view`
    #[must_use]
    pub fn new(view: Arc<dyn UploadView>) -> Self {
        Self { view }
    }

    /// Starts rendering a preview of `file`
    ///
    /// Does nothing when no file is selected. Otherwise the file is read on a
    /// spawned task and `show_preview` is called exactly once when it
    /// completes. A failed read is logged and leaves the view untouched.
    pub fn on_file_selected(&self, file: Option<SelectedFile>) -> Option<JoinHandle<()>> {
        let file = file?;
        let view = Arc::clone(&self.view);

        Some(tokio::spawn(async move {
            match Self::render(&file).await {
                Ok(url) => {
                    debug!("Rendered preview of {} ({} chars)", file.name(), url.len());
                    view.show_preview(&url);
                }
                Err(e) => warn!("Failed to read {} for preview: {e}", file.path().display()),
            }
        }))
    }

    /// Reads `file` and renders it as a data URL
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read
    pub async fn render(file: &SelectedFile) -> io::Result<String> {
        let bytes = file.read().await?;
        Ok(data_url(file.content_type(), &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(data_url("image/jpeg", b""), "data:image/jpeg;base64,");
    }
}
