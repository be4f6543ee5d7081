//! Application-wide error types.
//!
//! This module defines the top-level error type that encompasses every
//! layer's errors, using `thiserror` for derivation and conversion.

pub use crate::api::ApiError;
pub use crate::config::ConfigError;
pub use crate::events::SyncError;
pub use crate::state::StateError;

/// Main application error type.
///
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gateway construction or transport errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Classified orchestrator failures
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// State lookup errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
