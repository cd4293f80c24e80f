mod app;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    open_storage, validate_config, CatalogService, Config, MetadataProvider, OmdbClient,
};

use app::MovieApp;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("marquee.toml"));

    // Load configuration, falling back to defaults when no file exists
    let mut config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        marquee_core::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        Config::default()
    };

    // A positional argument overrides the configured catalog file
    if let Some(path) = std::env::args().nth(1) {
        config.storage.path = PathBuf::from(path);
    }

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Catalog file: {:?}", config.storage.path);

    // Open the storage backend matching the file extension
    let storage = open_storage(&config.storage.path)
        .with_context(|| format!("Failed to open catalog {:?}", config.storage.path))?;
    let service = CatalogService::new(storage);

    // Create metadata provider if configured
    let metadata: Option<Arc<dyn MetadataProvider>> = match &config.omdb {
        Some(omdb_config) => {
            info!("Initializing OMDb client");
            let client =
                OmdbClient::new(omdb_config.clone()).context("Failed to create OMDb client")?;
            Some(Arc::new(client))
        }
        None => {
            info!("OMDb not configured, movies are added with manual details");
            None
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = MovieApp::new(
        service,
        metadata,
        config.gallery.clone(),
        stdin.lock(),
        stdout.lock(),
    );
    app.run().await?;

    Ok(())
}
