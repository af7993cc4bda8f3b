//! Notification errors

use thiserror::Error;

/// Errors raised while sending a notification
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
	#[error("Invalid API key: {0}")]
	InvalidApiKey(String),

	#[error("Invalid base URL: {0}")]
	InvalidBaseUrl(String),

	#[error("Failed to sign request: {0}")]
	Token(String),

	#[error("Notify request failed: {0}")]
	Http(String),

	#[error("Notify API error ({status}): {message}")]
	Api { status: u16, message: String },

	#[error("Delivery failed: {0}")]
	Delivery(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
