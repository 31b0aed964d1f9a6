mod cleanup;
mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::lookup_host;
use tracing::info;

use chirpy_api::router::router;
use chirpy_api::state::AppStateInner;
use chirpy_db::Database;

use crate::config::Config;

/// Refresh-token cleanup interval.
const CLEANUP_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Parser)]
#[command(name = "chirpy", about = "Chirpy social posting server")]
struct Args {
    /// Wipe the database on startup.
    #[arg(long)]
    debug: bool,

    /// Database file, overriding CHIRPY_DB_PATH.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chirpy=debug,chirpy_api=debug,chirpy_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let db = Database::open(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;
    if args.debug {
        info!("--debug given, resetting database");
        db.reset()?;
    }

    let state = AppStateInner::new(
        db,
        config.jwt_secret.clone(),
        config.polka_key.clone(),
        config.access_token_ttl,
    );

    tokio::spawn(cleanup::run_cleanup_loop(state.clone(), CLEANUP_INTERVAL_SECS));

    let app = router(state, &config.file_root);

    let addr: SocketAddr = lookup_host((config.host.as_str(), config.port))
        .await?
        .next()
        .with_context(|| format!("cannot resolve {}", config.host))?;
    info!(
        "Chirpy serving {} on {}",
        config.file_root.display(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
