//! Error types for the `TimeBar` engine binary.

/// Top-level error for engine startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: timebar_core::config::ConfigError,
    },

    /// The simulated world clock could not be created.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: timebar_core::clock::ClockError,
    },

    /// The log filter could not be built.
    #[error("invalid log filter {filter:?}: {message}")]
    LogFilter {
        /// The rejected filter directive.
        filter: String,
        /// Description of the parse failure.
        message: String,
    },
}
