//! Upload configuration, built once at start-up and passed by reference

use std::env;

use super::{ConfigError, Environment};

/// Region of the identity pool and input bucket when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";
/// Identity pool used when none is configured
pub const DEFAULT_IDENTITY_POOL_ID: &str = "us-east-1:a3198016-dfe4-4a5d-838a-569e3ddd0b6e";
/// Input bucket used when none is configured
pub const DEFAULT_INPUT_BUCKET: &str = "serverless-image-processing-input-aa42ab4a";
/// Largest object the processing pipeline accepts (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Configuration shared by every upload component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Cloud region of the identity pool and bucket
    pub region: String,
    /// Identity pool exchanged for temporary credentials
    pub identity_pool_id: String,
    /// Bucket uploads are written to
    pub input_bucket: String,
    /// Size limit enforced before uploading
    pub max_upload_bytes: u64,
}

impl UploadConfig {
    /// Creates a configuration with the default size limit
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        identity_pool_id: impl Into<String>,
        input_bucket: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            identity_pool_id: identity_pool_id.into(),
            input_bucket: input_bucket.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Reads the configuration from `AWS_REGION`, `IDENTITY_POOL_ID`,
    /// `INPUT_BUCKET` and `MAX_UPLOAD_BYTES`
    ///
    /// Development falls back to built-in defaults; production and staging
    /// require every variable except `MAX_UPLOAD_BYTES`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` if a required variable is not set
    /// Returns `ConfigError::InvalidVar` if `MAX_UPLOAD_BYTES` is not a number
    pub fn from_env(environment: &Environment) -> Result<Self, ConfigError> {
        let lookup = |name: &'static str, default: &str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ if environment.allows_defaults() => Ok(default.to_string()),
                _ => Err(ConfigError::MissingVar(name)),
            }
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidVar {
                    name: "MAX_UPLOAD_BYTES",
                    value,
                })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            region: lookup("AWS_REGION", DEFAULT_REGION)?,
            identity_pool_id: lookup("IDENTITY_POOL_ID", DEFAULT_IDENTITY_POOL_ID)?,
            input_bucket: lookup("INPUT_BUCKET", DEFAULT_INPUT_BUCKET)?,
            max_upload_bytes,
        })
    }
}
