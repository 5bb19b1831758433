//! Process-wide constants: exit codes and pool defaults.

/// Normal termination / healthy probe.
pub const EXIT_OK: i32 = 0;

/// Steady-state unhealthy, reported by the `health-check` binary.
pub const EXIT_UNHEALTHY: i32 = 1;

/// Database unreachable after the startup retry budget (sysexits EX_UNAVAILABLE).
pub const EXIT_STARTUP_UNAVAILABLE: i32 = 69;

/// Missing or malformed configuration (sysexits EX_CONFIG).
pub const EXIT_CONFIG_INVALID: i32 = 78;

/// Default pool size, matching the bot's historical fixed pool of 20
/// connections with no overflow.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;

pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Per-attempt probe budget for the startup gate.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Probe budget for the orchestrator health check. Deliberately shorter than
/// the startup probe so a momentarily slow query does not get the process
/// killed by the orchestrator.
pub const DEFAULT_HEALTH_PROBE_TIMEOUT_SECS: u64 = 2;

pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_BACKOFF_SCHEDULE_SECS: [u64; 6] = [1, 2, 4, 8, 16, 32];
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_BACKOFF_CEILING_SECS: u64 = 30;
pub const DEFAULT_STARTUP_DEADLINE_SECS: u64 = 120;
