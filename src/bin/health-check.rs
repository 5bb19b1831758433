//! # Container Health Probe
//!
//! Zero-argument binary the orchestrator runs on a fixed interval
//! (`HEALTHCHECK CMD ["health-check"]`). Each invocation is a fresh process,
//! so it builds a single-connection lazy pool with the short health timeout,
//! probes once, prints a one-line JSON report, and exits 0 (healthy) or
//! non-zero (unhealthy). No retries here: consecutive-failure tolerance is
//! the orchestrator's job.

use std::process;
use tracing::error;

use mission_core::config::ConnectionConfig;
use mission_core::constants::EXIT_CONFIG_INVALID;
use mission_core::database::DatabasePool;
use mission_core::{health, logging};

#[tokio::main]
async fn main() {
    logging::init();

    let config = match ConnectionConfig::from_env() {
        Ok(config) => config.for_health_probe(),
        Err(err) => {
            error!(%err, "health check rejected configuration");
            process::exit(EXIT_CONFIG_INVALID);
        }
    };

    let pool = match DatabasePool::connect(&config) {
        Ok(pool) => pool,
        Err(err) => {
            error!(%err, "health check could not build probe pool");
            process::exit(EXIT_CONFIG_INVALID);
        }
    };

    let (report, code) = health::check(&pool, config.health_probe_timeout).await;
    match serde_json::to_string(&report) {
        Ok(line) => println!("{line}"),
        Err(err) => error!(%err, "failed to serialize health report"),
    }

    pool.close().await;
    process::exit(code);
}
