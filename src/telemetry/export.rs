//! Metrics export functionality.

use super::metrics::MetricsSnapshot;
use crate::error::Result;

/// Trait for exporting metrics to different destinations
pub trait MetricsExporter: Send + Sync {
    /// Export a metrics snapshot
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()>;
}

/// Export metrics as pretty-printed JSON to a file
pub struct JsonExporter {
    output_path: std::path::PathBuf,
}

impl JsonExporter {
    /// Create a new JSON exporter writing to `output_path`
    pub fn new(output_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl std::fmt::Debug for JsonExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonExporter")
            .field("output_path", &self.output_path)
            .finish()
    }
}

impl MetricsExporter for JsonExporter {
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        let serializable = SerializableSnapshot::from(snapshot);
        let json = serde_json::to_string_pretty(&serializable).map_err(|e| {
            crate::error::Error::telemetry(format!("JSON serialization failed: {}", e))
        })?;

        std::fs::write(&self.output_path, json)
            .map_err(|e| crate::error::Error::telemetry(format!("failed to write file: {}", e)))?;

        Ok(())
    }
}

/// Serializable version of MetricsSnapshot
#[derive(Debug, Clone, serde::Serialize)]
struct SerializableSnapshot {
    uptime_secs: f64,
    tasks_submitted: u64,
    tasks_executed: u64,
    tasks_panicked: u64,
    tasks_rejected: u64,
    tasks_discarded: u64,
    p50_queue_wait_us: f64,
    p99_queue_wait_us: f64,
    p50_exec_us: f64,
    p99_exec_us: f64,
    max_exec_us: f64,
}

impl From<&MetricsSnapshot> for SerializableSnapshot {
    fn from(s: &MetricsSnapshot) -> Self {
        Self {
            uptime_secs: s.uptime_secs,
            tasks_submitted: s.tasks_submitted,
            tasks_executed: s.tasks_executed,
            tasks_panicked: s.tasks_panicked,
            tasks_rejected: s.tasks_rejected,
            tasks_discarded: s.tasks_discarded,
            p50_queue_wait_us: s.p50_queue_wait_us,
            p99_queue_wait_us: s.p99_queue_wait_us,
            p50_exec_us: s.p50_exec_us,
            p99_exec_us: s.p99_exec_us,
            max_exec_us: s.max_exec_us,
        }
    }
}
