//! Task execution infrastructure.
//!
//! This module provides the core pieces of the pool: the task
//! representation, the shared FIFO queue, worker threads, the pool that
//! owns them, and the per-task panic boundary.

pub mod panic_handler;
pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicStrategy};
pub use pool::WorkerPool;
pub use queue::ShutdownMode;
pub use task::TaskId;
pub use worker::{WorkerId, WorkerPhase, WorkerState};
