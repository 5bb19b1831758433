//! # Micro-Mission Bot Entry Point
//!
//! Lifecycle shell for the bot process: logging, configuration, the startup
//! readiness gate, then hand-off to the run loop. The dispatcher that
//! handles commands and messages plugs in at [`run_until_shutdown`]; this
//! binary owns only the database lifecycle around it.

use std::process;
use tracing::{error, info};

use mission_core::config::ConnectionConfig;
use mission_core::constants::{EXIT_CONFIG_INVALID, EXIT_STARTUP_UNAVAILABLE};
use mission_core::database::DatabasePool;
use mission_core::{logging, startup};

#[tokio::main]
async fn main() {
    logging::init();
    info!(version = env!("CARGO_PKG_VERSION"), "starting mission bot");

    let config = match ConnectionConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "configuration rejected");
            process::exit(EXIT_CONFIG_INVALID);
        }
    };

    let pool = match DatabasePool::connect(&config) {
        Ok(pool) => pool,
        Err(err) => {
            error!(%err, "pool initialization rejected");
            process::exit(EXIT_CONFIG_INVALID);
        }
    };

    // block boot until the database answers; a dead database at startup is
    // fatal, not silently retried forever
    if let Err(exhausted) = startup::wait_for_database(&pool, &config).await {
        error!(%exhausted, "giving up on database startup");
        pool.close().await;
        process::exit(EXIT_STARTUP_UNAVAILABLE);
    }

    run_until_shutdown(&pool).await;

    pool.close().await;
    info!("bot shutdown complete");
}

/// Run-loop seam: the bot dispatcher owns the pool from here until shutdown.
/// Stands in by parking on the termination signal.
async fn run_until_shutdown(pool: &DatabasePool) {
    let metrics = pool.metrics();
    info!(
        pool_size = metrics.size,
        max_connections = metrics.max_connections,
        "bot run loop started"
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
