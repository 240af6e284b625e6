//! Predicted locations of the derivatives produced by the processing pipeline

use serde::Serialize;

/// URLs where the resized image and thumbnail are expected to appear
///
/// These are predictions: the objects may not exist yet when the links are
/// produced, and nothing here checks that they ever will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedLinks {
    /// Location of the resized derivative
    pub resized_url: String,
    /// Location of the thumbnail derivative
    pub thumbnail_url: String,
}

/// Output bucket paired with an input bucket
///
/// Only the first occurrence of `input` is replaced; a name without it is
/// returned unchanged.
#[must_use]
pub fn output_bucket_name(input_bucket: &str) -> String {
    input_bucket.replacen("input", "output", 1)
}

/// Computes the derivative URLs for an uploaded object key
#[must_use]
pub fn predict(object_key: &str, input_bucket: &str) -> DerivedLinks {
    let output_bucket = output_bucket_name(input_bucket);

    DerivedLinks {
        resized_url: format!("https://{output_bucket}.s3.amazonaws.com/resized/{object_key}"),
        thumbnail_url: format!("https://{output_bucket}.s3.amazonaws.com/thumbnail/{object_key}"),
    }
}
