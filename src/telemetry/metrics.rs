//! Metrics collection for pool monitoring.

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Pool metrics collector.
///
/// Counters are lock-free; the latency histograms sit behind an `RwLock`
/// for interior mutability. All recording paths are cheap enough to sit on
/// the worker hot path.
#[derive(Debug)]
pub struct Metrics {
    // task counters
    tasks_submitted: AtomicU64,
    tasks_executed: AtomicU64,
    tasks_panicked: AtomicU64,
    tasks_rejected: AtomicU64,
    tasks_discarded: AtomicU64,

    // time from submission to dequeue
    queue_wait_histogram: RwLock<Histogram<u64>>,
    // time spent executing
    exec_time_histogram: RwLock<Histogram<u64>>,

    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        // 3 significant figures, max value of 1 hour in nanoseconds
        let make_histogram = || {
            Histogram::new_with_max(3_600_000_000_000, 3).expect("failed to create histogram")
        };

        Self {
            tasks_submitted: AtomicU64::new(0),
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            tasks_rejected: AtomicU64::new(0),
            tasks_discarded: AtomicU64::new(0),
            queue_wait_histogram: RwLock::new(make_histogram()),
            exec_time_histogram: RwLock::new(make_histogram()),
            start_time: Instant::now(),
        }
    }

    /// Record an accepted submission.
    pub fn record_task_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a submission rejected because the pool was closed.
    pub fn record_task_rejected(&self) {
        self.tasks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed execution with its queue-wait and run durations.
    pub fn record_task_execution(&self, queue_wait_ns: u64, exec_ns: u64) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
        let _ = self.queue_wait_histogram.write().record(queue_wait_ns);
        let _ = self.exec_time_histogram.write().record(exec_ns);
    }

    /// Record a task that panicked.
    pub fn record_task_panic(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the final count of tasks discarded by an immediate shutdown.
    pub fn record_tasks_discarded(&self, count: u64) {
        self.tasks_discarded.store(count, Ordering::Relaxed);
    }

    /// Take a consistent-enough point-in-time snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let queue_wait = self.queue_wait_histogram.read();
        let exec_time = self.exec_time_histogram.read();

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs_f64(),
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            tasks_rejected: self.tasks_rejected.load(Ordering::Relaxed),
            tasks_discarded: self.tasks_discarded.load(Ordering::Relaxed),
            p50_queue_wait_us: queue_wait.value_at_quantile(0.50) as f64 / 1_000.0,
            p99_queue_wait_us: queue_wait.value_at_quantile(0.99) as f64 / 1_000.0,
            p50_exec_us: exec_time.value_at_quantile(0.50) as f64 / 1_000.0,
            p99_exec_us: exec_time.value_at_quantile(0.99) as f64 / 1_000.0,
            max_exec_us: exec_time.max() as f64 / 1_000.0,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of pool metrics.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Seconds since the collector was created.
    pub uptime_secs: f64,
    /// Submissions accepted.
    pub tasks_submitted: u64,
    /// Tasks run to completion (including panicked ones).
    pub tasks_executed: u64,
    /// Tasks that panicked.
    pub tasks_panicked: u64,
    /// Submissions rejected after shutdown began.
    pub tasks_rejected: u64,
    /// Tasks discarded unexecuted by an immediate shutdown.
    pub tasks_discarded: u64,
    /// Median time from submission to dequeue, microseconds.
    pub p50_queue_wait_us: f64,
    /// 99th-percentile time from submission to dequeue, microseconds.
    pub p99_queue_wait_us: f64,
    /// Median execution time, microseconds.
    pub p50_exec_us: f64,
    /// 99th-percentile execution time, microseconds.
    pub p99_exec_us: f64,
    /// Longest observed execution time, microseconds.
    pub max_exec_us: f64,
}
