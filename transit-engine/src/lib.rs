//! # transit-engine
//!
//! Transition executor for transit.
//!
//! This crate provides:
//! - The `TransitionExecutor` and its three entry points
//! - Language-variant expansion of query candidates
//! - Run reports with per-rule breakdowns and collected failures
//! - Executor configuration (failure policy, narrowing trust)

pub mod config;
pub mod error;
pub mod executor;
pub mod report;

pub use config::{ConfigError, ExecutorConfig, FailurePolicy};
pub use error::EngineError;
pub use executor::TransitionExecutor;
pub use report::{ApplyFailure, RuleRun, TransitionReport};
