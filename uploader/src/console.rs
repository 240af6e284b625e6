use std::path::PathBuf;

use image_uploader::links::DerivedLinks;
use image_uploader::view::{UploadStatus, UploadView};
use tracing::{debug, error, info};

/// Where a rendered preview goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSink {
    /// Printed as the command's output
    Stdout,
    /// Written to a file
    File(PathBuf),
    /// Only noted in the debug log, keeping stdout for the links
    Log,
}

/// Terminal rendition of the upload page
pub struct ConsoleView {
    preview: PreviewSink,
    json: bool,
}

impl ConsoleView {
    pub const fn new(preview: PreviewSink, json: bool) -> Self {
        Self { preview, json }
    }
}

impl UploadView for ConsoleView {
    fn set_status(&self, status: UploadStatus) {
        eprintln!("{status}");
    }

    fn alert(&self, message: &str) {
        eprintln!("[!] {message}");
    }

    fn show_preview(&self, data_url: &str) {
        match &self.preview {
            PreviewSink::Stdout => println!("{data_url}"),
            PreviewSink::File(path) => match std::fs::write(path, data_url) {
                Ok(()) => info!("Preview written to {}", path.display()),
                Err(e) => error!("Failed to write preview to {}: {e}", path.display()),
            },
            PreviewSink::Log => debug!("Preview rendered ({} chars)", data_url.len()),
        }
    }

    fn show_links(&self, links: &DerivedLinks) {
        if self.json {
            match serde_json::to_string_pretty(links) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Failed to serialize links: {e}"),
            }
        } else {
            println!("Resized:   {}", links.resized_url);
            println!("Thumbnail: {}", links.thumbnail_url);
        }
    }

    fn set_upload_enabled(&self, _enabled: bool) {}
}
