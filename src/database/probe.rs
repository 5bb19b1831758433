//! Readiness probing: one minimal round trip under a hard timeout.
//!
//! The prober never raises. Every failure class is folded into
//! [`ProbeResult`], which makes it safe to call in a loop from the startup
//! gate and from the health-check binary without per-call-site error
//! handling.

use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::database::DatabasePool;
use crate::error::{CoreError, Result};

/// Outcome of a single readiness probe. Produced fresh on every call,
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProbeResult {
    /// The round trip completed within the timeout.
    Ready {
        #[serde(with = "latency_millis")]
        latency: Duration,
    },
    /// The database did not answer; `detail` carries the driver message.
    Unready {
        reason: UnreadyReason,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnreadyReason {
    /// No connection could be established or checked out.
    ConnectFailed,
    /// A connection existed but the round-trip query failed on it.
    QueryFailed,
    /// The probe budget elapsed before the driver answered.
    TimedOut,
}

impl ProbeResult {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProbeResult::Ready { .. })
    }
}

/// Probe the database through the pool, returning within `timeout` even if
/// the underlying driver hangs.
pub async fn probe(pool: &DatabasePool, timeout: Duration) -> ProbeResult {
    let result = guarded(round_trip(pool), timeout).await;
    debug!(ready = result.is_ready(), ?timeout, "readiness probe finished");
    result
}

/// Run `op` under a hard deadline and classify the outcome.
///
/// Split out from [`probe`] so the never-hangs guarantee is testable against
/// an operation that never completes.
async fn guarded<F>(op: F, timeout: Duration) -> ProbeResult
where
    F: Future<Output = Result<()>>,
{
    let started = Instant::now();
    match tokio::time::timeout(timeout, op).await {
        Ok(Ok(())) => ProbeResult::Ready {
            latency: started.elapsed(),
        },
        Ok(Err(err)) => ProbeResult::Unready {
            reason: classify(&err),
            detail: err.to_string(),
        },
        Err(_) => ProbeResult::Unready {
            reason: UnreadyReason::TimedOut,
            detail: format!("no response within {timeout:?}"),
        },
    }
}

/// Acquire, `SELECT 1`, release (on drop).
async fn round_trip(pool: &DatabasePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&mut *conn)
        .await
        .map_err(CoreError::QueryFailed)?;
    Ok(())
}

fn classify(err: &CoreError) -> UnreadyReason {
    match err {
        CoreError::QueryFailed(_) => UnreadyReason::QueryFailed,
        CoreError::TimedOut(_) | CoreError::PoolExhausted(_) => UnreadyReason::TimedOut,
        _ => UnreadyReason::ConnectFailed,
    }
}

mod latency_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(latency.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future;

    #[tokio::test(start_paused = true)]
    async fn guarded_returns_timed_out_against_a_hanging_operation() {
        let result = guarded(future::pending(), Duration::from_millis(200)).await;
        assert_eq!(
            result,
            ProbeResult::Unready {
                reason: UnreadyReason::TimedOut,
                detail: "no response within 200ms".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn guarded_classifies_success() {
        let result = guarded(async { Ok(()) }, Duration::from_secs(1)).await;
        assert!(result.is_ready());
    }

    #[tokio::test]
    async fn guarded_classifies_query_failure() {
        let result = guarded(
            async { Err(CoreError::QueryFailed(sqlx::Error::RowNotFound)) },
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(
            match result {
                ProbeResult::Unready { reason, .. } => reason,
                _ => panic!("expected unready"),
            },
            UnreadyReason::QueryFailed
        );
    }

    #[tokio::test]
    async fn pool_exhaustion_reads_as_timeout() {
        let result = guarded(
            async { Err(CoreError::PoolExhausted(Duration::from_secs(5))) },
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(
            match result {
                ProbeResult::Unready { reason, .. } => reason,
                _ => panic!("expected unready"),
            },
            UnreadyReason::TimedOut
        );
    }
}
