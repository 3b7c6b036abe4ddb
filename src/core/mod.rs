//! Core infrastructure.
//!
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Error types and wire mapping
//! - [`telemetry`] - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
