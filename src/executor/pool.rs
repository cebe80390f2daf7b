//! The worker pool: owns the queue and the fixed set of worker threads.

use super::panic_handler::PanicHandler;
use super::queue::{ShutdownMode, TaskQueue};
use super::task::Task;
use super::worker::{Worker, WorkerId, WorkerState};
use crate::config::Config;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;

#[cfg(target_os = "linux")]
fn pin_thread_to_core(core_id: usize) {
    unsafe {
        let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_id, &mut cpuset);
        let result = libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &cpuset,
        );
        if result != 0 {
            eprintln!(
                "failed to pin thread {} to core {}",
                thread::current().name().unwrap_or("unknown"),
                core_id
            );
        }
    }
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
    state: Arc<WorkerState>,
}

/// A fixed-size pool of worker threads draining a shared FIFO queue.
///
/// The pool is an owned value: there is no process-wide instance, and no
/// worker thread outlives the handle. Dropping an un-shut-down pool performs
/// an immediate shutdown.
///
/// Tasks are fire-and-forget; completion order across workers is not
/// defined, only dequeue order is (strict FIFO). A task that blocks
/// indefinitely ties up one worker for its duration; the pool cannot
/// preempt it.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    queue: Arc<TaskQueue>,
    panic_handler: Arc<PanicHandler>,
    num_threads: usize,
    shut_down: bool,
    #[cfg(feature = "telemetry")]
    metrics: Option<Arc<Metrics>>,
}

impl WorkerPool {
    /// Spawn `config.worker_threads()` workers and start serving tasks.
    ///
    /// Thread creation failure is not recoverable at this layer: any workers
    /// already spawned are torn down and the error is returned.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();
        let queue = Arc::new(TaskQueue::new());
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));

        #[cfg(feature = "telemetry")]
        let metrics = config.enable_telemetry.then(|| Arc::new(Metrics::new()));

        let mut workers: Vec<WorkerHandle> = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id);
            let state = worker.state.clone();

            #[cfg(feature = "telemetry")]
            let worker = match metrics {
                Some(ref m) => worker.with_metrics(m.clone()),
                None => worker,
            };

            let queue_clone = queue.clone();
            let handler_clone = panic_handler.clone();
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let pin_workers = config.pin_workers;
            let spawned = builder.spawn(move || {
                #[cfg(target_os = "linux")]
                if pin_workers {
                    pin_thread_to_core(id);
                }
                #[cfg(not(target_os = "linux"))]
                let _ = pin_workers;

                worker.run(queue_clone, handler_clone);
            });

            let thread = match spawned {
                Ok(thread) => thread,
                Err(e) => {
                    // tear down what we already started before reporting
                    queue.close(ShutdownMode::Immediate);
                    for handle in workers.iter_mut() {
                        if let Some(t) = handle.thread.take() {
                            let _ = t.join();
                        }
                    }
                    return Err(Error::executor(format!("spawn failed: {}", e)));
                }
            };

            workers.push(WorkerHandle {
                id,
                thread: Some(thread),
                state,
            });
        }

        Ok(Self {
            workers,
            queue,
            panic_handler,
            num_threads,
            shut_down: false,
            #[cfg(feature = "telemetry")]
            metrics,
        })
    }

    /// Submit a closure for execution on some worker.
    ///
    /// Returns [`Error::PoolClosed`] once shutdown has begun. On success the
    /// task is queued (the queue is unbounded, so this never blocks) and one
    /// idle worker, if any, is woken.
    pub fn submit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let result = self.queue.push(Task::new(f));

        #[cfg(feature = "telemetry")]
        if let Some(ref metrics) = self.metrics {
            match result {
                Ok(()) => metrics.record_task_submitted(),
                Err(_) => metrics.record_task_rejected(),
            }
        }

        result
    }

    /// Stop the pool, joining every worker thread before returning.
    ///
    /// [`ShutdownMode::Graceful`] blocks until all queued tasks have run;
    /// [`ShutdownMode::Immediate`] discards tasks not yet dequeued. A task
    /// already executing always runs to completion. A second call returns
    /// [`Error::AlreadyShutdown`] without touching the threads again.
    pub fn shutdown(&mut self, mode: ShutdownMode) -> Result<()> {
        if self.shut_down {
            return Err(Error::AlreadyShutdown);
        }
        self.shut_down = true;

        self.queue.close(mode);

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    // only reachable if the worker loop itself unwound
                    eprintln!("worker {} terminated abnormally", worker.id);
                }
            }
        }

        #[cfg(feature = "telemetry")]
        if let Some(ref metrics) = self.metrics {
            metrics.record_tasks_discarded(self.queue.discarded());
        }

        Ok(())
    }

    /// Number of worker threads, fixed at construction.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Tasks currently waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Tasks dropped unexecuted by an immediate shutdown.
    pub fn discarded_tasks(&self) -> u64 {
        self.queue.discarded()
    }

    /// Total task panics caught across all workers.
    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }

    /// Per-worker execution counters, indexed by worker ordinal.
    pub fn worker_stats(&self) -> Vec<Arc<WorkerState>> {
        self.workers.iter().map(|w| w.state.clone()).collect()
    }

    /// The metrics collector, if telemetry is enabled for this pool.
    #[cfg(feature = "telemetry")]
    pub fn metrics(&self) -> Option<Arc<Metrics>> {
        self.metrics.clone()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.shut_down {
            let _ = self.shutdown(ShutdownMode::Immediate);
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads)
            .field("queue", &self.queue)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}
