//! drover - a fixed-size worker pool over a blocking FIFO queue.
//!
//! A small in-process concurrency primitive: N long-lived worker threads
//! drain a shared, lock-protected queue of submitted closures. Strict FIFO
//! dequeue order, explicit immediate/graceful shutdown, and per-task panic
//! isolation so one bad task never costs the pool a worker.
//!
//! # Quick Start
//!
//! ```no_run
//! use drover::prelude::*;
//!
//! let config = Config::builder().num_threads(4).build().unwrap();
//! let mut pool = WorkerPool::new(&config).unwrap();
//!
//! for i in 0..10 {
//!     pool.submit(move || {
//!         println!("task {} running", i);
//!     }).unwrap();
//! }
//!
//! // finish everything queued, then join the workers
//! pool.shutdown(ShutdownMode::Graceful).unwrap();
//! ```
//!
//! # Guarantees
//!
//! - Tasks are dequeued in submission order (FIFO). Completion order is
//!   not defined when more than one worker runs.
//! - Each task executes at most once, on exactly one worker.
//! - `shutdown` joins every worker before returning; no thread outlives
//!   the pool handle.
//! - A panicking task is caught and counted; the worker keeps serving.
//!
//! # Caveats
//!
//! Task execution is assumed synchronous: a task that blocks indefinitely
//! starves one worker for its duration, which the pool cannot detect or
//! preempt. The queue is unbounded; callers needing backpressure must
//! throttle upstream.

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;

#[cfg(feature = "telemetry")]
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, ShutdownMode, WorkerPool};
