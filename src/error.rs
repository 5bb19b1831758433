use std::time::Duration;

/// Error taxonomy for the database lifecycle core.
///
/// Only two failures are allowed to take the process down: invalid
/// configuration and startup retry-budget exhaustion. Everything else is
/// returned to the caller as a typed result.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Required configuration is missing or malformed. Fatal at process
    /// start; a misconfiguration will not self-heal.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The database did not accept a connection. Transient; retried by the
    /// startup gate during boot.
    #[error("database connect failed: {0}")]
    ConnectFailed(#[source] sqlx::Error),

    /// A round-trip query failed on an established connection.
    #[error("database query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// The operation did not complete within its timeout budget.
    #[error("database operation timed out after {0:?}")]
    TimedOut(Duration),

    /// No connection became available within the pool's wait timeout.
    /// Local backpressure signal; never escalated to process-fatal.
    #[error("connection pool exhausted after waiting {0:?}")]
    PoolExhausted(Duration),
}

pub type Result<T> = std::result::Result<T, CoreError>;
