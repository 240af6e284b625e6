//! Image uploader: preview a local image, upload it with identity-pool
//! credentials and predict where its processed derivatives will appear

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Temporary credentials from an identity pool
pub mod credentials;

/// Derivative link prediction
pub mod links;

/// S3 object storage
pub mod media_storage;

/// Local image preview
pub mod preview;

/// Configuration and environment
pub mod types;

/// Upload flow
pub mod upload;

/// Presentation surface
pub mod view;
