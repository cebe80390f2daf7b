//! Shared FIFO task queue.
//!
//! One mutex guards the pending sequence and the lifecycle phase together,
//! so count, order and shutdown state are never observed as an inconsistent
//! pair. A single condvar announces both "task available" and "phase
//! changed". This is the only point of contention in the pool.

use super::task::Task;
use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Queue lifecycle phase.
///
/// `Open` accepts and serves tasks; `Draining` serves remaining tasks but
/// accepts no new ones (graceful shutdown); `Closed` serves nothing
/// (immediate shutdown, or a drain that finished).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Open,
    Draining,
    Closed,
}

/// How a shutdown treats tasks still queued at the time of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Discard queued tasks; workers exit as soon as they observe the flag.
    Immediate,
    /// Serve every queued task before workers exit.
    Graceful,
}

struct QueueState {
    tasks: VecDeque<Task>,
    phase: Phase,
    discarded: u64,
}

/// Lock-protected FIFO of pending tasks, shared by the pool and its workers.
pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                phase: Phase::Open,
                discarded: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Append a task at the tail and wake one waiter.
    ///
    /// Never blocks: the queue is unbounded. Fails with [`Error::PoolClosed`]
    /// once shutdown has begun, checked under the same lock that orders the
    /// append against `close`, so no submission can slip in after the phase
    /// change.
    pub fn push(&self, task: Task) -> Result<()> {
        let mut state = self.state.lock();

        if state.phase != Phase::Open {
            return Err(Error::PoolClosed);
        }

        state.tasks.push_back(task);
        // exactly one task became available, wake exactly one waiter
        self.available.notify_one();

        Ok(())
    }

    /// Remove and return the head task, blocking while the queue is empty.
    ///
    /// Returns `None` when the worker should exit: the queue is `Closed`,
    /// or `Draining` with nothing left. The lock is released before the
    /// returned task runs, so execution never serializes behind the queue.
    pub fn pop_blocking(&self) -> Option<Task> {
        let mut state = self.state.lock();

        loop {
            match state.phase {
                Phase::Closed => return None,
                Phase::Draining if state.tasks.is_empty() => return None,
                _ => {}
            }

            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }

            self.available.wait(&mut state);
        }
    }

    /// Transition the queue out of service and wake every waiter.
    ///
    /// Broadcast, not single-signal: every blocked worker must re-evaluate
    /// its exit condition. Immediate mode drops queued tasks here, so the
    /// discard is deterministic at the instant of the call.
    pub fn close(&self, mode: ShutdownMode) {
        let mut state = self.state.lock();

        match mode {
            ShutdownMode::Immediate => {
                state.phase = Phase::Closed;
                state.discarded += state.tasks.len() as u64;
                state.tasks.clear();
            }
            ShutdownMode::Graceful => {
                // Closed already wins over Draining
                if state.phase == Phase::Open {
                    state.phase = Phase::Draining;
                }
            }
        }

        self.available.notify_all();
    }

    /// Number of tasks currently pending.
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Tasks discarded unexecuted by an immediate shutdown.
    pub fn discarded(&self) -> u64 {
        self.state.lock().discarded
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.state.lock().phase
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("len", &state.tasks.len())
            .field("phase", &state.phase)
            .field("discarded", &state.discarded)
            .finish()
    }
}
