// worker thread loop and per-worker stats
use super::panic_handler::PanicHandler;
use super::queue::TaskQueue;
use super::task::Task;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;

/// Ordinal index of a worker within its pool.
pub type WorkerId = usize;

/// Where a worker currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Blocked on the queue, ready for work.
    Waiting,
    /// Running a dequeued task.
    Executing,
    /// Observed shutdown and returned from the loop.
    Exiting,
}

const PHASE_WAITING: u8 = 0;
const PHASE_EXECUTING: u8 = 1;
const PHASE_EXITING: u8 = 2;

// stats for each worker, shared with the pool
#[derive(Debug)]
pub struct WorkerState {
    /// Tasks this worker ran to completion (including panicked ones).
    pub tasks_executed: AtomicU64,
    /// Tasks that panicked on this worker.
    pub tasks_panicked: AtomicU64,
    phase: AtomicU8,
}

impl WorkerState {
    fn new() -> Self {
        Self {
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            phase: AtomicU8::new(PHASE_WAITING),
        }
    }

    /// Current lifecycle phase of the worker.
    pub fn phase(&self) -> WorkerPhase {
        match self.phase.load(Ordering::Acquire) {
            PHASE_EXECUTING => WorkerPhase::Executing,
            PHASE_EXITING => WorkerPhase::Exiting,
            _ => WorkerPhase::Waiting,
        }
    }

    fn set_phase(&self, phase: WorkerPhase) {
        let raw = match phase {
            WorkerPhase::Waiting => PHASE_WAITING,
            WorkerPhase::Executing => PHASE_EXECUTING,
            WorkerPhase::Exiting => PHASE_EXITING,
        };
        self.phase.store(raw, Ordering::Release);
    }
}

pub(crate) struct Worker {
    pub id: WorkerId,
    pub state: Arc<WorkerState>,
    #[cfg(feature = "telemetry")]
    pub metrics: Option<Arc<Metrics>>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            state: Arc::new(WorkerState::new()),
            #[cfg(feature = "telemetry")]
            metrics: None,
        }
    }

    #[cfg(feature = "telemetry")]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    // main loop: block on the queue, run tasks, exit on the shutdown sentinel
    pub fn run(&self, queue: Arc<TaskQueue>, panic_handler: Arc<PanicHandler>) {
        loop {
            match queue.pop_blocking() {
                Some(task) => {
                    self.state.set_phase(WorkerPhase::Executing);
                    self.execute_task(task, &panic_handler);
                    self.state.set_phase(WorkerPhase::Waiting);
                }
                None => {
                    self.state.set_phase(WorkerPhase::Exiting);
                    break;
                }
            }
        }
    }

    fn execute_task(&self, task: Task, panic_handler: &PanicHandler) {
        let queued_ns = task.spawn_time.elapsed().as_nanos() as u64;
        let start = Instant::now();

        // the handler owns logging/abort policy for the panic itself
        let result = panic_handler.execute(|| task.execute());

        let duration_ns = start.elapsed().as_nanos() as u64;

        match result {
            Ok(()) =>
            {
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_execution(queued_ns, duration_ns);
                }
            }
            Err(_info) => {
                self.state.tasks_panicked.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_panic();
                }
            }
        }

        #[cfg(not(feature = "telemetry"))]
        let _ = (queued_ns, duration_ns);

        self.state.tasks_executed.fetch_add(1, Ordering::Relaxed);
    }
}
