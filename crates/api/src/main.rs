//! Bankdesk API server
//!
//! Usage:
//! ```bash
//! bankdesk --port 8080 --database-url sqlite:data/bankdesk.db
//! BANKDESK_LOG_LEVEL=debug bankdesk
//! ```

use anyhow::{Context, Result};
use bankdesk_api::{create_router, AppConfig, AppState};
use bankdesk_persistence::Database;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Bankdesk - back-office account movement service
#[derive(Parser)]
#[command(name = "bankdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind host (overrides BANKDESK_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides BANKDESK_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite URL (overrides BANKDESK_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Pool size (overrides BANKDESK_MAX_CONNECTIONS)
    #[arg(long)]
    max_connections: Option<u32>,

    /// Per-request timeout in seconds (overrides BANKDESK_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Write-lock wait in milliseconds (overrides BANKDESK_BUSY_TIMEOUT_MS)
    #[arg(long)]
    busy_timeout_ms: Option<u64>,

    /// Log filter, e.g. "info" or "bankdesk_business=debug" (overrides BANKDESK_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.database_url {
            config.database_url = url;
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(ms) = self.busy_timeout_ms {
            config.busy_timeout_ms = ms;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

/// Create the directory holding a file-backed SQLite database
fn ensure_database_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().apply(AppConfig::from_env());

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    ensure_database_dir(&config.database_url)?;
    let db = Database::init_with(
        &config.database_url,
        config.max_connections,
        config.busy_timeout(),
    )
    .await
    .with_context(|| format!("opening database {}", config.database_url))?;
    tracing::info!(url = %config.database_url, "database ready");

    let app = create_router(AppState::new(db, config.request_timeout()));

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("API server starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
