//! Metrics collection and export.
//!
//! Counters and latency histograms describing what the pool has done, plus
//! exporters for getting a snapshot out of the process.

pub mod export;
pub mod metrics;

pub use export::{JsonExporter, MetricsExporter};
pub use metrics::{Metrics, MetricsSnapshot};
