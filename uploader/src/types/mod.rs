mod config;
mod environment;
mod error;

pub use config::{
    UploadConfig, DEFAULT_IDENTITY_POOL_ID, DEFAULT_INPUT_BUCKET, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_REGION,
};
pub use environment::Environment;
pub use error::ConfigError;
