//! Pool configuration and its builder.

use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
///
/// The worker count is fixed for the lifetime of the pool; everything else
/// here tunes how those workers are spawned and how task panics are handled.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads. `None` means one per logical CPU.
    pub num_threads: Option<usize>,

    /// What to do when a task panics inside a worker.
    pub panic_strategy: PanicStrategy,

    /// Pin each worker to the core matching its index (Linux only).
    pub pin_workers: bool,

    /// Stack size for worker threads, in bytes.
    pub stack_size: Option<usize>,

    /// Prefix for worker thread names (`"<prefix>-<index>"`).
    pub thread_name_prefix: String,

    /// Collect execution metrics.
    #[cfg(feature = "telemetry")]
    pub enable_telemetry: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            panic_strategy: PanicStrategy::default(),
            pin_workers: false,
            stack_size: Some(2 * 1024 * 1024),
            thread_name_prefix: "drover-worker".to_string(),

            #[cfg(feature = "telemetry")]
            enable_telemetry: true,
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the configuration for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::config("num_threads must be > 0"));
            }
            if n > 1024 {
                return Err(Error::config("num_threads too large (max 1024)"));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    /// The effective worker count.
    pub fn worker_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the worker thread count.
    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    /// Set the panic strategy for task faults.
    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    /// Pin workers to cores (Linux only; ignored elsewhere).
    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.config.pin_workers = pin;
        self
    }

    /// Set the worker stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Enable or disable metrics collection.
    #[cfg(feature = "telemetry")]
    pub fn enable_telemetry(mut self, enable: bool) -> Self {
        self.config.enable_telemetry = enable;
        self
    }

    /// Validate and produce the final configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::default().worker_threads() >= 1);
    }

    #[test]
    fn zero_threads_rejected() {
        let result = Config::builder().num_threads(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn oversized_pool_rejected() {
        let result = Config::builder().num_threads(4096).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn builder_sets_fields() {
        let config = Config::builder()
            .num_threads(3)
            .thread_name_prefix("unit")
            .stack_size(512 * 1024)
            .build()
            .unwrap();

        assert_eq!(config.worker_threads(), 3);
        assert_eq!(config.thread_name_prefix, "unit");
        assert_eq!(config.stack_size, Some(512 * 1024));
    }
}
