//! Locally selected file handle

use std::io;
use std::path::{Path, PathBuf};

use mime::Mime;

/// Extensions the processing pipeline turns into derivatives
const PROCESSED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A file chosen by the user, with its declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    path: PathBuf,
}

impl SelectedFile {
    /// Creates a handle with an explicit name and content type
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            path: path.into(),
        }
    }

    /// Creates a handle named after the path's final component, with the
    /// content type derived from its extension
    ///
    /// Returns `None` when the path has no usable file name.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_str()?;

        Some(Self::new(name, content_type_for(path).essence_str(), path))
    }

    /// Original file name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Location on disk
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the processing pipeline handles this file type
    #[must_use]
    pub fn is_processable(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                PROCESSED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }

    /// Size on disk, without reading the contents
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the metadata cannot be read, or
    /// `InvalidInput` if the path is not a regular file (directory, FIFO,
    /// device)
    pub async fn size(&self) -> io::Result<u64> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", self.path.display()),
            ));
        }
        Ok(metadata.len())
    }

    /// Reads the full contents without blocking the runtime
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Content type implied by a path's extension
#[must_use]
pub fn content_type_for(path: &Path) -> Mime {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("bmp") => mime::IMAGE_BMP,
        Some("svg") => mime::IMAGE_SVG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
