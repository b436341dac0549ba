//! Error types for the xxo crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the xxo crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board size {width}x{height} (both dimensions must be at least 3)")]
    InvalidSize { width: usize, height: usize },

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("invalid state key '{key}': {reason}")]
    InvalidStateKey { key: String, reason: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("value table at {} is missing or empty", path.display())]
    EmptyTable { path: PathBuf },

    #[error("invalid value table line {line}: {reason}")]
    InvalidTableLine { line: usize, reason: String },

    #[error("value table has {found} actions per state but the board has {expected} cells")]
    ActionSpaceMismatch { expected: usize, found: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid reward schedule '{input}': {reason}")]
    ParseReward { input: String, reason: String },

    #[error("invalid credit assignment '{input}'. Expected one of: {expected}")]
    ParseCredit { input: String, expected: String },

    #[error("failed to build worker thread pool: {message}")]
    ThreadPool { message: String },

    #[error("worker {worker} failed: {message}")]
    WorkerFailed { worker: usize, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
