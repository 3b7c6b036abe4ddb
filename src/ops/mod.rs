//! Operations.
//!
//! - [`metrics`] - Request counters and gauges

pub mod metrics;
