use std::path::PathBuf;

use clap::{Parser, Subcommand};

use image_uploader::types::UploadConfig;

/// Preview and upload images for the serverless processing pipeline
#[derive(Debug, Parser)]
#[command(name = "image-uploader", version)]
pub struct Cli {
    /// Region of the identity pool and input bucket
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Identity pool exchanged for temporary credentials
    #[arg(long, global = true)]
    pub identity_pool_id: Option<String>,

    /// Bucket uploads are written to
    #[arg(long, global = true)]
    pub input_bucket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a file as a data URL
    Preview {
        /// Image to preview
        file: PathBuf,

        /// Write the data URL here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload a file and print the predicted derivative links
    Upload {
        /// Image to upload
        file: PathBuf,

        /// Write the preview data URL here before uploading
        #[arg(long)]
        preview_out: Option<PathBuf>,

        /// Print the links as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration
    ///
    /// Flags win over `AWS_REGION`, `IDENTITY_POOL_ID` and `INPUT_BUCKET`.
    pub fn apply_overrides(&self, mut config: UploadConfig) -> UploadConfig {
        if let Some(region) = &self.region {
            config.region.clone_from(region);
        }
        if let Some(identity_pool_id) = &self.identity_pool_id {
            config.identity_pool_id.clone_from(identity_pool_id);
        }
        if let Some(input_bucket) = &self.input_bucket {
            config.input_bucket.clone_from(input_bucket);
        }
        config
    }
}
