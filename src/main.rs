use anyhow::{Context, Result};
use prompt_gateway::{config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// `RUST_LOG` wins over the configured level; either must name a plain level.
fn log_filter(configured: &str) -> Result<(String, EnvFilter)> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| configured.to_string());

    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })?;
    let filter = EnvFilter::try_new(&level)?;

    Ok((level, filter))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()
        .await
        .context("Failed to load configuration")?;

    let (level, filter) = log_filter(&config.server.logs.level)?;
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(
        "Serving POST /inference on {}:{} (log level: {})",
        config.server.host, config.server.port, level
    );

    server::run(config).await?;

    Ok(())
}
