mod cli;
mod console;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use image_uploader::{
    credentials::CognitoCredentialBroker,
    media_storage::MediaStorage,
    preview::PreviewController,
    types::{Environment, UploadConfig},
    upload::{SelectedFile, UploadClient},
};

use cli::{Cli, Command};
use console::{ConsoleView, PreviewSink};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let environment = Environment::from_env()?;

    // Use JSON format for staging/production, regular format for development
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();
    if environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    match &cli.command {
        Command::Preview { file, out } => {
            let sink = out.clone().map_or(PreviewSink::Stdout, PreviewSink::File);
            let view = Arc::new(ConsoleView::new(sink, false));
            let selected = SelectedFile::from_path(file);
            if let Some(task) = PreviewController::new(view).on_file_selected(selected) {
                task.await.context("preview task panicked")?;
            }
        }
        Command::Upload {
            file,
            preview_out,
            json,
        } => {
            let config = cli.apply_overrides(UploadConfig::from_env(&environment)?);
            info!(
                "Uploading to bucket {} in {} via identity pool {}",
                config.input_bucket, config.region, config.identity_pool_id
            );

            let sdk_config = environment.aws_config(&config.region).await;
            let broker = Arc::new(CognitoCredentialBroker::new(
                &sdk_config,
                config.identity_pool_id.clone(),
            ));
            let store = Arc::new(MediaStorage::new(environment.clone(), sdk_config));
            let sink = preview_out.clone().map_or(PreviewSink::Log, PreviewSink::File);
            let view = Arc::new(ConsoleView::new(sink, *json));

            let selected = SelectedFile::from_path(file);
            if let Some(task) = PreviewController::new(view.clone()).on_file_selected(selected.clone())
            {
                task.await.context("preview task panicked")?;
            }

            let client = UploadClient::new(config, broker, store, view);

            let cancel = CancellationToken::new();
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Received Ctrl+C, cancelling upload...");
                        signal_cancel.cancel();
                    }
                    Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
                }
            });

            // Failures were already shown through the view and logged
            if client
                .upload_until_cancelled(selected.as_ref(), &cancel)
                .await
                .is_err()
            {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
