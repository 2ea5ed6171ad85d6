//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::cli::{error, info, success, warn};
use crate::config;
use crate::store::PgStore;

/// Initialize a new legistrack.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("legistrack.toml");

    if config_path.exists() {
        warn("legistrack.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created legistrack.toml");
    info("Edit the configuration file and run 'legistrack migrate' to set up the database");

    Ok(())
}

/// Create or verify the database schema
pub async fn migrate() -> Result<()> {
    let config = config::load_config()?;

    info("Connecting to database...");
    match ensure_schema(&config).await {
        Ok(()) => {
            success("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            error(&format!("Migration failed: {}", e));
            Err(e.into())
        }
    }
}

async fn ensure_schema(config: &config::Config) -> crate::error::Result<()> {
    let store = PgStore::connect(&config.database).await?;
    store.ensure_schema().await
}

/// Start the portal server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config()?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting portal at http://{}:{}", host, port));

    crate::portal::run_server(config, &host, port).await?;
    Ok(())
}
