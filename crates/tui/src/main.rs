mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use gamepick_core::{
    catalog::{CatalogProvider, CatalogStore, JsonCatalog, SampleCatalog},
    config::{self, AppConfig},
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let provider: Box<dyn CatalogProvider> = match config.catalog_path.as_ref() {
        Some(path) => {
            tracing::info!("Using catalog file {}", path.display());
            Box::new(JsonCatalog::new(path))
        }
        None => Box::new(SampleCatalog),
    };
    let store = CatalogStore::new(provider);

    let mut app = app::GamepickApp::new(config, store);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamepick.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
