//! # Health Endpoint Adapter
//!
//! Thin mapping from a probe outcome to the process exit status the
//! container orchestrator understands. The mapping itself is pure; the only
//! side effect of a health check is the probe's transient acquire/release.
//! Retry policy belongs to the orchestrator's health-check configuration,
//! not here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::constants::{EXIT_OK, EXIT_UNHEALTHY};
use crate::database::{probe, DatabasePool, ProbeResult, UnreadyReason};

/// One-line status report emitted by the `health-check` binary.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnreadyReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Map a probe outcome to an orchestrator exit status.
pub fn exit_code(result: &ProbeResult) -> i32 {
    if result.is_ready() {
        EXIT_OK
    } else {
        EXIT_UNHEALTHY
    }
}

/// Build the status report for a probe outcome.
pub fn report(result: &ProbeResult) -> HealthReport {
    match result {
        ProbeResult::Ready { latency } => HealthReport {
            healthy: true,
            latency_ms: Some(latency.as_millis() as u64),
            reason: None,
            detail: None,
            checked_at: Utc::now(),
        },
        ProbeResult::Unready { reason, detail } => HealthReport {
            healthy: false,
            latency_ms: None,
            reason: Some(*reason),
            detail: Some(detail.clone()),
            checked_at: Utc::now(),
        },
    }
}

/// Probe once with the health budget and return the report plus exit code.
pub async fn check(pool: &DatabasePool, timeout: Duration) -> (HealthReport, i32) {
    let result = probe(pool, timeout).await;
    let code = exit_code(&result);
    (report(&result), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EXIT_OK, EXIT_UNHEALTHY};

    #[test]
    fn ready_maps_to_success_exit() {
        let result = ProbeResult::Ready {
            latency: Duration::from_millis(4),
        };
        assert_eq!(exit_code(&result), EXIT_OK);

        let report = report(&result);
        assert!(report.healthy);
        assert_eq!(report.latency_ms, Some(4));
        assert!(report.reason.is_none());
    }

    #[test]
    fn every_unready_variant_maps_to_failure_exit() {
        for reason in [
            UnreadyReason::ConnectFailed,
            UnreadyReason::QueryFailed,
            UnreadyReason::TimedOut,
        ] {
            let result = ProbeResult::Unready {
                reason,
                detail: "probe failed".to_string(),
            };
            assert_eq!(exit_code(&result), EXIT_UNHEALTHY);
            assert!(!report(&result).healthy);
        }
    }

    #[test]
    fn unready_report_serializes_reason_and_detail() {
        let result = ProbeResult::Unready {
            reason: UnreadyReason::TimedOut,
            detail: "no response within 2s".to_string(),
        };
        let json = serde_json::to_string(&report(&result)).unwrap();
        assert!(json.contains("\"healthy\":false"));
        assert!(json.contains("TimedOut"));
        assert!(json.contains("no response within 2s"));
    }
}
