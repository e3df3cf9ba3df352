//! Core utilities, configuration, errors, and logging

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use error::{AppError, AppResult, StorageError, ValidationError};
pub use logging::{init_logger, install_panic_hook, log_startup_configuration};
