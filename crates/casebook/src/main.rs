//! # casebook
//!
//! Casebook server binary. Loads settings, opens the database, and serves
//! the HTTP API until Ctrl-C or SIGTERM.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use casebook_server::metrics::install_recorder;
use casebook_server::{CasebookServer, ServerConfig, SqliteIdentityProvider, wait_for_signal};
use casebook_settings::CasebookSettings;
use casebook_store::{ConnectionConfig, ConnectionPool};

/// Casebook server.
#[derive(Parser, Debug)]
#[command(name = "casebook", about = "Legal case management server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Settings file to load instead of `~/.casebook/settings.json`.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level filter, e.g. `debug` (overrides settings; `RUST_LOG` wins).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Apply flags over loaded settings. Flags win over file and env values.
    fn apply(&self, settings: &mut CasebookSettings) {
        if let Some(ref host) = self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(ref path) = self.db_path {
            settings.database.path = path.to_string_lossy().into_owned();
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Open the file-backed pool and bring the schema up to date.
fn open_database(path: &Path, settings: &CasebookSettings) -> Result<ConnectionPool> {
    ensure_parent_dir(path)?;
    let config = ConnectionConfig {
        pool_size: settings.database.pool_size,
        busy_timeout_ms: settings.database.busy_timeout_ms,
    };
    let pool = casebook_store::new_file(path, &config)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        casebook_store::run_migrations(&conn).context("Failed to run migrations")?;
    }
    Ok(pool)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut settings = match args.settings {
        Some(ref path) => casebook_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => casebook_settings::load_settings().with_context(|| {
            format!(
                "Failed to load settings: {}",
                casebook_settings::settings_path().display()
            )
        })?,
    };
    args.apply(&mut settings);

    casebook_core::init_subscriber(&settings.logging.level, settings.logging.json);

    let db_path = casebook_settings::resolve_db_path(&settings);
    let pool = open_database(&db_path, &settings)?;
    info!(path = %db_path.display(), "database ready");

    let metrics = install_recorder().context("Failed to install metrics recorder")?;

    let config = ServerConfig::from_settings(&settings);
    let shutdown_timeout = config.shutdown_timeout();
    let identity = Arc::new(SqliteIdentityProvider::new(pool.clone()));
    let server = CasebookServer::new(config, pool, identity, metrics);

    let (addr, handle) = server
        .listen()
        .await
        .context("Failed to bind server")?;
    info!("casebook listening on http://{addr}");

    wait_for_signal().await;

    info!("shutting down");
    server
        .shutdown()
        .graceful_shutdown(handle, Some(shutdown_timeout))
        .await;

    info!("shutdown complete");
    Ok(())
}
