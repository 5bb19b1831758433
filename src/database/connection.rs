//! Process-wide PostgreSQL connection pool.
//!
//! The pool is constructed explicitly at startup and handed to the run loop
//! and the health adapter; there is no implicit module-level singleton, so a
//! startup failure surfaces at boot instead of on an arbitrary later request.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{CoreError, Result};

/// Owner of the bot's database connections.
///
/// Checkout is bounded: `acquire` waits at most the configured acquire
/// timeout and every handle returns to the pool (or is discarded if broken)
/// when dropped. Connections are validated before reuse, mirroring the bot's
/// historical pre-ping behavior.
#[derive(Debug)]
pub struct DatabasePool {
    pool: PgPool,
    acquire_timeout: Duration,
    max_connections: u32,
}

impl DatabasePool {
    /// Allocate the pool without eagerly opening connections.
    ///
    /// Reachability is deliberately not verified here; that is the startup
    /// gate's job. The only failure mode is a malformed connection URL,
    /// which is a configuration error.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options: PgConnectOptions = config
            .database_url()
            .parse()
            .map_err(|e: sqlx::Error| CoreError::ConfigInvalid(format!("database URL: {e}")))?;

        info!(
            host = %config.host,
            database = %config.database,
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout.as_secs(),
            "initializing database pool"
        );

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            acquire_timeout: config.acquire_timeout,
            max_connections: config.max_connections,
        })
    }

    /// Check out a live connection, waiting at most the acquire timeout.
    ///
    /// The returned handle is always a validated connection; it returns to
    /// the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => CoreError::PoolExhausted(self.acquire_timeout),
            other => CoreError::ConnectFailed(other),
        })
    }

    /// Raw pool handle for the application's own queries.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            size: self.pool.size(),
            num_idle: self.pool.num_idle() as u32,
            max_connections: self.max_connections,
            is_closed: self.pool.is_closed(),
        }
    }

    /// Close all pooled connections. Idempotent; safe during error unwind.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            debug!("database pool already closed");
            return;
        }
        info!("closing database pool");
        self.pool.close().await;
    }
}

/// Point-in-time pool counters for logging and tests.
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub size: u32,
    pub num_idle: u32,
    pub max_connections: u32,
    pub is_closed: bool,
}

impl PoolMetrics {
    /// Connections currently checked out.
    pub fn checked_out(&self) -> u32 {
        self.size.saturating_sub(self.num_idle)
    }
}
