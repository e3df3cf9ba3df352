use std::path::PathBuf;

use thiserror::Error;

/// Centralized error type for the application
///
/// Handler-level failures are converted to this enum so the dispatcher can log
/// them uniformly. Rejected user input never reaches it: the navigation
/// controller answers [`ValidationError`]s with a text reply.
///
/// # Example
///
/// ```no_run
/// use catalogbot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog document could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures of the catalog document on disk.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Rule violations reported back to the user as plain text.
///
/// The `Display` text is exactly what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Category already exists!")]
    CategoryExists(String),

    #[error("Category does not exist!")]
    CategoryMissing(String),

    #[error("Invalid format. Use `category:subcategory`.")]
    InvalidTarget,
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
