mod app;
mod audio;
mod config;
mod controller;
mod error;
mod input;
mod messages;
mod permission;
mod services;
mod ui;

use app::App;
use config::Config;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the panel on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting voicerecord");

    let config = Config::load()?;
    config.validate()?;

    // LocalSet for !Send futures (the capture handle holds a cpal::Stream)
    let local = tokio::task::LocalSet::new();

    local
        .run_until(async move { App::new(config)?.run().await })
        .await
}
