//! Per-task fault boundary.
//!
//! A panicking task is a caller-authoring defect, but it must never cost the
//! pool a worker: the worker catches the unwind, records it, and moves on to
//! the next task.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What to do when a task panics inside a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicStrategy {
    /// Abort the process. For callers who treat any panic as fatal.
    Abort,
    /// Swallow the panic silently; only the counter records it.
    Isolate,
    /// Log the panic to stderr and keep going.
    LogAndContinue,
}

impl Default for PanicStrategy {
    fn default() -> Self {
        PanicStrategy::LogAndContinue
    }
}

/// Executes closures behind a panic boundary and counts failures.
#[derive(Debug)]
pub struct PanicHandler {
    strategy: PanicStrategy,
    panic_count: AtomicUsize,
}

impl PanicHandler {
    /// Create a handler with the given strategy.
    pub fn new(strategy: PanicStrategy) -> Self {
        Self {
            strategy,
            panic_count: AtomicUsize::new(0),
        }
    }

    /// Run `f`, converting an unwind into a [`PanicInfo`].
    pub fn execute<F, R>(&self, f: F) -> Result<R, PanicInfo>
    where
        F: FnOnce() -> R,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => Ok(result),
            Err(payload) => {
                self.panic_count.fetch_add(1, Ordering::Relaxed);

                let info = PanicInfo::from_payload(payload);

                match self.strategy {
                    PanicStrategy::Abort => {
                        eprintln!("drover: task panicked (abort strategy): {}", info.message);
                        std::process::abort();
                    }
                    PanicStrategy::Isolate => {}
                    PanicStrategy::LogAndContinue => {
                        eprintln!("drover: task panicked: {}", info.message);
                    }
                }

                Err(info)
            }
        }
    }

    /// Number of panics seen so far.
    pub fn panic_count(&self) -> usize {
        self.panic_count.load(Ordering::Relaxed)
    }

    /// Reset the panic counter to zero.
    pub fn reset_count(&self) {
        self.panic_count.store(0, Ordering::Relaxed);
    }

    /// The configured strategy.
    pub fn strategy(&self) -> PanicStrategy {
        self.strategy
    }
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self::new(PanicStrategy::default())
    }
}

/// Extracted description of a task panic.
#[derive(Debug, Clone)]
pub struct PanicInfo {
    /// The panic message, if the payload was a string.
    pub message: String,
}

impl PanicInfo {
    fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };

        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolate_catches_and_counts() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let result = handler.execute(|| {
            panic!("test panic");
        });

        assert!(result.is_err());
        assert_eq!(handler.panic_count(), 1);
    }

    #[test]
    fn success_passes_through() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let result = handler.execute(|| 42);

        assert_eq!(result.unwrap(), 42);
        assert_eq!(handler.panic_count(), 0);
    }

    #[test]
    fn payload_message_extracted() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let err = handler.execute(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(err.message, "boom 7");
    }

    #[test]
    fn counter_accumulates_and_resets() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        for _ in 0..5 {
            let _ = handler.execute(|| panic!("test"));
        }
        assert_eq!(handler.panic_count(), 5);

        handler.reset_count();
        assert_eq!(handler.panic_count(), 0);
    }
}
