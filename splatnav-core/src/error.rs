//! Error types for splatnav

use thiserror::Error;

/// Main error type for splatnav operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for splatnav operations
pub type Result<T> = std::result::Result<T, Error>;
