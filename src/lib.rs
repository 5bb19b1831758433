#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Mission Core Rust
//!
//! Database connection lifecycle and readiness-gating core for the
//! Micro-Mission bot: one process-wide PostgreSQL pool with explicit
//! startup/shutdown boundaries, a startup gate that absorbs the
//! "bot starts before its database is ready" race, and the health probe the
//! container orchestrator runs against the process.
//!
//! ## Module Organization
//!
//! - [`config`] - environment-sourced connection and retry settings
//! - [`database`] - the pool and the readiness prober
//! - [`startup`] - the boot-time readiness gate (retry with capped backoff)
//! - [`health`] - probe-to-exit-code mapping for the orchestrator
//! - [`error`] - structured error handling
//! - [`logging`] - tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mission_core::config::ConnectionConfig;
//! use mission_core::database::DatabasePool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::from_env()?;
//! let pool = DatabasePool::connect(&config)?;
//! mission_core::startup::wait_for_database(&pool, &config).await?;
//! // hand `pool` to the bot's run loop
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod health;
pub mod logging;
pub mod startup;

pub use config::{ConnectionConfig, RetryConfig};
pub use database::{probe, DatabasePool, PoolMetrics, ProbeResult, UnreadyReason};
pub use error::{CoreError, Result};
pub use startup::{GateDecision, GateState, StartupGate};
