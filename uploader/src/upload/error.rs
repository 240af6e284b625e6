//! Error types for the upload flow

use thiserror::Error;

use crate::credentials::AuthError;
use crate::media_storage::BucketError;
use crate::view::UploadStatus;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// User-correctable problems detected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing was selected
    #[error("Please select an image first")]
    NoFileSelected,

    /// The processing pipeline ignores this file type
    #[error("Unsupported file type: only JPG and PNG images are processed")]
    UnsupportedFileType {
        /// Name of the rejected file
        file_name: String,
    },

    /// The processing pipeline rejects files this large
    #[error("Image exceeds the {} processing limit", display_limit(.limit))]
    FileTooLarge {
        /// Size of the rejected file in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
}

const MIB: u64 = 1024 * 1024;

/// Limits of a MiB or more read in whole MB, rounded up; smaller ones in bytes
fn display_limit(limit: &u64) -> String {
    if *limit < MIB {
        format!("{limit} bytes")
    } else {
        format!("{} MB", limit.div_ceil(MIB))
    }
}

/// Terminal outcome of a failed upload attempt
#[derive(Error, Debug)]
pub enum UploadError {
    /// The selection cannot be uploaded
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Temporary credentials could not be obtained
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The object could not be stored
    #[error("Upload failed: {0}")]
    Upload(#[from] BucketError),

    /// The selected file could not be read
    #[error("Failed to read selected file: {0}")]
    FileRead(#[source] std::io::Error),

    /// Another upload is still in flight
    #[error("An upload is already in progress")]
    UploadInProgress,

    /// The attempt was cancelled before it finished
    #[error("Upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Status text shown for this failure, if any
    #[must_use]
    pub const fn status(&self) -> Option<UploadStatus> {
        match self {
            Self::Auth(_) => Some(UploadStatus::AuthenticationFailed),
            Self::Upload(_) | Self::FileRead(_) => Some(UploadStatus::UploadFailed),
            Self::Cancelled => Some(UploadStatus::Cancelled),
            Self::Validation(_) | Self::UploadInProgress => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::NoFileSelected.to_string(),
            "Please select an image first"
        );
        assert_eq!(
            ValidationError::FileTooLarge {
                size: 6 * 1024 * 1024,
                limit: 5 * 1024 * 1024
            }
            .to_string(),
            "Image exceeds the 5 MB processing limit"
        );
    }

    #[test]
    fn test_small_and_uneven_limits() {
        let too_large = |limit| ValidationError::FileTooLarge {
            size: limit + 1,
            limit,
        };

        assert_eq!(
            too_large(1000).to_string(),
            "Image exceeds the 1000 bytes processing limit"
        );
        assert_eq!(
            too_large(5 * MIB + 1).to_string(),
            "Image exceeds the 6 MB processing limit"
        );
        assert_eq!(
            too_large(MIB).to_string(),
            "Image exceeds the 1 MB processing limit"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            UploadError::Auth(AuthError::MissingField("credentials")).status(),
            Some(UploadStatus::AuthenticationFailed)
        );
        assert_eq!(
            UploadError::Upload(BucketError::S3Error("AccessDenied".to_string())).status(),
            Some(UploadStatus::UploadFailed)
        );
        assert_eq!(
            UploadError::FileRead(std::io::Error::from(std::io::ErrorKind::NotFound)).status(),
            Some(UploadStatus::UploadFailed)
        );
        assert_eq!(
            UploadError::from(ValidationError::NoFileSelected).status(),
            None
        );
        assert_eq!(UploadError::UploadInProgress.status(), None);
    }
}
