//! Storage error types.

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by a content store
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("File not found: {0}")]
	NotFound(String),

	#[error("Invalid file name: {0}")]
	InvalidName(String),

	#[error("Storage configuration error: {0}")]
	ConfigError(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
