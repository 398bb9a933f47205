//! # keyfill-server
//!
//! HTTP front end for the keyfill merge engine: upload a workbook, get the
//! merged workbook back as a download.
//!
//! - `GET /health`
//! - `POST /sheets` with the xlsx document as body: sheet names and defaults
//! - `POST /merge?target=..&source=..` with the xlsx document as body

mod config;
mod routes;

use anyhow::{Context, Result};
use config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let app = routes::create_router(config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!(
        addr = %config.addr,
        max_upload_bytes = config.max_upload_bytes,
        "keyfill-server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
