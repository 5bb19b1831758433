//! # Database Layer
//!
//! Connection lifecycle for the bot's PostgreSQL store.
//!
//! ## Key Components
//!
//! - [`connection`] - the single process-wide pool: bounded checkout,
//!   recycling, explicit shutdown
//! - [`probe`] - readiness probing with a hard timeout, used by both the
//!   startup gate and the container health check
//!
//! All socket side effects of the crate live behind this module; no other
//! component holds raw connection handles.

pub mod connection;
pub mod probe;

pub use connection::{DatabasePool, PoolMetrics};
pub use probe::{probe, ProbeResult, UnreadyReason};
