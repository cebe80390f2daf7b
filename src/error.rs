//! Error types for pool construction, submission and shutdown.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the pool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration rejected by [`Config::validate`](crate::Config::validate).
    #[error("config error: {0}")]
    Config(String),

    /// Worker thread creation or pool bring-up failed.
    #[error("executor error: {0}")]
    Executor(String),

    /// `submit` was called after shutdown began.
    #[error("pool is closed to new submissions")]
    PoolClosed,

    /// `shutdown` was called more than once.
    #[error("pool already shut down")]
    AlreadyShutdown,

    /// I/O error from the platform layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything that does not fit the variants above.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::Config`] from any string-ish message.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Build a [`Error::Executor`] from any string-ish message.
    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    /// Build a telemetry-tagged [`Error::Other`].
    #[cfg(feature = "telemetry")]
    pub fn telemetry<S: Into<String>>(msg: S) -> Self {
        Error::Other(format!("telemetry: {}", msg.into()))
    }
}
