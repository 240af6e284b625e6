//! Presentation surface driven by the upload and preview flows

use strum::{AsRefStr, Display};

use crate::links::DerivedLinks;

/// Progress states shown to the user, one per stage transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum UploadStatus {
    /// Credentials are being resolved
    #[strum(serialize = "Authenticating...")]
    Authenticating,
    /// Credential exchange failed
    #[strum(serialize = "Authentication failed")]
    AuthenticationFailed,
    /// Bytes are being transmitted
    #[strum(serialize = "Uploading image...")]
    Uploading,
    /// Transmission failed
    #[strum(serialize = "Upload failed")]
    UploadFailed,
    /// Object stored; derivatives are expected later
    #[strum(serialize = "Upload successful. Processing started...")]
    Succeeded,
    /// The in-flight attempt was abandoned
    #[strum(serialize = "Upload cancelled")]
    Cancelled,
}

/// User-facing elements: status text, alert, preview image, derivative links
/// and the upload trigger
pub trait UploadView: Send + Sync {
    /// Replaces the status text
    fn set_status(&self, status: UploadStatus);

    /// Shows a blocking message for user-correctable mistakes
    fn alert(&self, message: &str);

    /// Displays a rendered preview
    fn show_preview(&self, data_url: &str);

    /// Points the resized and thumbnail links at their predicted locations
    fn show_links(&self, links: &DerivedLinks);

    /// Enables or disables the upload trigger
    fn set_upload_enabled(&self, enabled: bool);
}

/// Test doubles for the presentation surface
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{Mutex, PoisonError};

    use super::{DerivedLinks, UploadStatus, UploadView};

    /// One call made on the view
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ViewEvent {
        /// `set_status`
        Status(UploadStatus),
        /// `alert`
        Alert(String),
        /// `show_preview`
        Preview(String),
        /// `show_links`
        Links(DerivedLinks),
        /// `set_upload_enabled`
        UploadEnabled(bool),
    }

    /// View recording every call in order
    #[derive(Debug, Default)]
    pub struct RecordingView {
        events: Mutex<Vec<ViewEvent>>,
    }

    impl RecordingView {
        /// Creates an empty view
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn record(&self, event: ViewEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }

        /// All recorded calls
        #[must_use]
        pub fn events(&self) -> Vec<ViewEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Status transitions, in order
        #[must_use]
        pub fn statuses(&self) -> Vec<UploadStatus> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ViewEvent::Status(status) => Some(status),
                    _ => None,
                })
                .collect()
        }

        /// Alert messages, in order
        #[must_use]
        pub fn alerts(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ViewEvent::Alert(message) => Some(message),
                    _ => None,
                })
                .collect()
        }

        /// Rendered previews, in order
        #[must_use]
        pub fn previews(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ViewEvent::Preview(data_url) => Some(data_url),
                    _ => None,
                })
                .collect()
        }

        /// Displayed derivative links, in order
        #[must_use]
        pub fn links(&self) -> Vec<DerivedLinks> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ViewEvent::Links(links) => Some(links),
                    _ => None,
                })
                .collect()
        }
    }

    impl UploadView for RecordingView {
        fn set_status(&self, status: UploadStatus) {
            self.record(ViewEvent::Status(status));
        }

        fn alert(&self, message: &str) {
            self.record(ViewEvent::Alert(message.to_string()));
        }

        fn show_preview(&self, data_url: &str) {
            self.record(ViewEvent::Preview(data_url.to_string()));
        }

        fn show_links(&self, links: &DerivedLinks) {
            self.record(ViewEvent::Links(links.clone()));
        }

        fn set_upload_enabled(&self, enabled: bool) {
            self.record(ViewEvent::UploadEnabled(enabled));
        }
    }
}
