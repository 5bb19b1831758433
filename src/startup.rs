//! # Startup Gate
//!
//! Blocks process boot until the database answers a readiness probe, or the
//! retry budget runs out. Orchestrators routinely start the bot and its
//! database concurrently, and the database's listening socket can exist
//! before it can serve queries (mid-recovery, mid-migration); the gate
//! absorbs that race instead of pushing a crash loop onto the orchestrator.
//!
//! The decision logic is a clock-free state machine ([`StartupGate`]) so
//! tests drive it synchronously; only the async driver ([`run_gate`])
//! actually sleeps.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::{ConnectionConfig, RetryConfig};
use crate::database::{probe, DatabasePool, ProbeResult};

/// Gate lifecycle: `Waiting` until the first successful probe (`Ready`) or
/// budget exhaustion (`Failed`). Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Waiting,
    Ready,
    Failed,
}

/// Next action after feeding one probe outcome to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The database answered; hand control to the run loop.
    Proceed,
    /// Not ready yet; sleep this long and probe again.
    RetryAfter(Duration),
    /// Budget exhausted; the process must exit with the fatal startup code.
    GiveUp,
}

/// Retry bookkeeping for the boot phase. Lives only while the gate runs.
#[derive(Debug)]
pub struct StartupGate {
    retry: RetryConfig,
    state: GateState,
    attempts: u32,
    /// Backoff scheduled so far, checked against the startup deadline.
    scheduled: Duration,
}

impl StartupGate {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            retry,
            state: GateState::Waiting,
            attempts: 0,
            scheduled: Duration::ZERO,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Probes observed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Feed one probe outcome and decide the next action.
    ///
    /// Pure with respect to the clock: no sleeping, no time reads. Calling
    /// after a terminal state repeats the terminal decision.
    pub fn observe(&mut self, result: &ProbeResult) -> GateDecision {
        match self.state {
            GateState::Ready => return GateDecision::Proceed,
            GateState::Failed => return GateDecision::GiveUp,
            GateState::Waiting => {}
        }

        self.attempts += 1;

        if result.is_ready() {
            self.state = GateState::Ready;
            return GateDecision::Proceed;
        }

        if self.attempts >= self.retry.max_attempts {
            self.state = GateState::Failed;
            return GateDecision::GiveUp;
        }

        let delay = self.retry.delay_for(self.attempts - 1);
        self.scheduled += delay;
        if self.scheduled > self.retry.startup_deadline {
            self.state = GateState::Failed;
            return GateDecision::GiveUp;
        }

        GateDecision::RetryAfter(delay)
    }
}

/// Fatal startup outcome: the database never became reachable within the
/// retry budget. The process must exit with the startup-unavailable code.
#[derive(Debug, thiserror::Error)]
#[error("database unreachable after {attempts} attempts over {elapsed:?}: {last_detail}")]
pub struct RetryBudgetExhausted {
    pub attempts: u32,
    pub elapsed: Duration,
    pub last_detail: String,
}

/// Drive the gate with the real prober against the process pool.
pub async fn wait_for_database(
    pool: &DatabasePool,
    config: &ConnectionConfig,
) -> Result<u32, RetryBudgetExhausted> {
    run_gate(&config.retry, || probe(pool, config.probe_timeout)).await
}

/// Drive the gate to a terminal state with an arbitrary probe function.
///
/// Returns the number of probes on success. Generic over the probe so tests
/// inject scripted outcomes and run under paused time.
pub async fn run_gate<F, Fut>(
    retry: &RetryConfig,
    mut probe_fn: F,
) -> Result<u32, RetryBudgetExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult>,
{
    let mut gate = StartupGate::new(retry.clone());
    let started = Instant::now();

    loop {
        let result = probe_fn().await;
        match gate.observe(&result) {
            GateDecision::Proceed => {
                info!(attempts = gate.attempts(), "database ready");
                return Ok(gate.attempts());
            }
            GateDecision::RetryAfter(delay) => {
                warn!(
                    attempt = gate.attempts(),
                    max_attempts = retry.max_attempts,
                    delay_secs = delay.as_secs(),
                    detail = %unready_detail(&result),
                    "database not ready, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            GateDecision::GiveUp => {
                let exhausted = RetryBudgetExhausted {
                    attempts: gate.attempts(),
                    elapsed: started.elapsed(),
                    last_detail: unready_detail(&result),
                };
                error!(
                    attempts = exhausted.attempts,
                    elapsed_secs = exhausted.elapsed.as_secs(),
                    detail = %exhausted.last_detail,
                    "startup retry budget exhausted"
                );
                return Err(exhausted);
            }
        }
    }
}

fn unready_detail(result: &ProbeResult) -> String {
    match result {
        ProbeResult::Ready { .. } => String::new(),
        ProbeResult::Unready { reason, detail } => format!("{reason:?}: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::UnreadyReason;

    fn retry(max_attempts: u32, schedule_secs: &[u64]) -> RetryConfig {
        RetryConfig {
            max_attempts,
            backoff_schedule: schedule_secs.iter().map(|s| Duration::from_secs(*s)).collect(),
            backoff_multiplier: 2.0,
            backoff_ceiling: Duration::from_secs(30),
            startup_deadline: Duration::from_secs(600),
        }
    }

    fn unready() -> ProbeResult {
        ProbeResult::Unready {
            reason: UnreadyReason::ConnectFailed,
            detail: "connection refused".to_string(),
        }
    }

    fn ready() -> ProbeResult {
        ProbeResult::Ready {
            latency: Duration::from_millis(1),
        }
    }

    #[test]
    fn gate_proceeds_on_first_success() {
        let mut gate = StartupGate::new(retry(3, &[1, 2, 4]));
        assert_eq!(gate.observe(&ready()), GateDecision::Proceed);
        assert_eq!(gate.state(), GateState::Ready);
        assert_eq!(gate.attempts(), 1);
    }

    #[test]
    fn gate_backs_off_along_the_schedule() {
        let mut gate = StartupGate::new(retry(5, &[1, 2, 4]));
        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(1))
        );
        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(gate.state(), GateState::Waiting);
    }

    #[test]
    fn gate_fails_after_the_attempt_budget() {
        // attempts land at t=0, 1, 3; the third failure exhausts the budget
        let mut gate = StartupGate::new(retry(3, &[1, 2, 4]));
        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(1))
        );
        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(gate.observe(&unready()), GateDecision::GiveUp);
        assert_eq!(gate.state(), GateState::Failed);
        assert_eq!(gate.attempts(), 3);
    }

    #[test]
    fn gate_fails_when_the_deadline_cannot_be_met() {
        let mut config = retry(10, &[10]);
        config.startup_deadline = Duration::from_secs(15);
        let mut gate = StartupGate::new(config);

        assert_eq!(
            gate.observe(&unready()),
            GateDecision::RetryAfter(Duration::from_secs(10))
        );
        // next delay would push scheduled backoff past the deadline
        assert_eq!(gate.observe(&unready()), GateDecision::GiveUp);
        assert_eq!(gate.state(), GateState::Failed);
    }

    #[test]
    fn terminal_states_repeat_their_decision() {
        let mut gate = StartupGate::new(retry(1, &[1]));
        assert_eq!(gate.observe(&unready()), GateDecision::GiveUp);
        assert_eq!(gate.observe(&ready()), GateDecision::GiveUp);
        assert_eq!(gate.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_succeeds_after_k_attempts_with_bounded_elapsed() {
        let mut outcomes = vec![unready(), unready(), ready()].into_iter();
        let started = Instant::now();

        let attempts = run_gate(&retry(5, &[1, 2, 4]), || {
            let next = outcomes.next().expect("gate probed past the script");
            async move { next }
        })
        .await
        .unwrap();

        assert_eq!(attempts, 3);
        // two backoff sleeps: 1s + 2s
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn driver_exhausts_budget_against_a_dead_database() {
        let started = Instant::now();

        let err = run_gate(&retry(3, &[1, 2, 4]), || async { unready() })
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(err.last_detail.contains("connection refused"));
    }
}
