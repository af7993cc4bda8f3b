//! Backends: what happens to the data of a valid form
//!
//! A form runs its backends one after another. The first failure stops the
//! chain and is returned; backends that already ran are not undone.

use crate::data::{CleanedData, FormData};
use async_trait::async_trait;
use formulary_notify::NotifyError;
use formulary_sessions::Session;
use serde_json::Value;

/// The request a backend runs for: submitted data plus the browser session
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
	pub data: FormData,
	pub session: Session,
}

impl FormRequest {
	pub fn new(data: FormData, session: Session) -> Self {
		Self { data, session }
	}
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
	#[error("Storage error: {0}")]
	Storage(String),

	#[error("Delivery failed: {0}")]
	Delivery(#[from] NotifyError),

	#[error("HTTP error: {0}")]
	Http(String),

	#[error("Session error: {0}")]
	Session(String),

	#[error("Configuration error: {0}")]
	Configuration(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Processes the cleaned data of a valid form.
///
/// Must return an error whenever the data was not handled; callers treat
/// `Ok` as success.
#[async_trait]
pub trait Backend: Send + Sync {
	async fn process(
		&self,
		request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()>;
}

impl std::fmt::Debug for dyn Backend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Backend")
	}
}

/// Writes an audit line for every submission
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackend;

#[async_trait]
impl Backend for LogBackend {
	async fn process(
		&self,
		_request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		let data = serde_json::to_string(data).map_err(|e| BackendError::Storage(e.to_string()))?;
		tracing::info!(form = name, %data, "form processed");
		Ok(())
	}
}

fn as_object(data: &CleanedData) -> serde_json::Map<String, Value> {
	data.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Stores the data in the session under the form name, replacing what was there
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBackend;

#[async_trait]
impl Backend for SessionBackend {
	async fn process(
		&self,
		request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		request.session.set(name, Value::Object(as_object(data)));
		Ok(())
	}
}

/// Merges the data into the session entry for the form name
#[derive(Debug, Clone, Copy, Default)]
pub struct AddSessionBackend;

#[async_trait]
impl Backend for AddSessionBackend {
	async fn process(
		&self,
		request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		match request.session.get_mut(name) {
			Some(Value::Object(existing)) => existing.extend(as_object(data)),
			Some(other) => {
				return Err(BackendError::Session(format!(
					"session entry '{}' is not an object: {}",
					name, other
				)));
			}
			None => request.session.set(name, Value::Object(as_object(data))),
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::sync::{Arc, Mutex};
	use tracing_subscriber::layer::SubscriberExt as _;
	use tracing_subscriber::util::SubscriberInitExt as _;

	fn cleaned(pairs: &[(&str, Value)]) -> CleanedData {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[tokio::test]
	async fn test_session_backend_overwrites() {
		let mut request = FormRequest::default();
		request.session.set("profile", json!({"name": "Old", "age": 40}));

		SessionBackend
			.process(&mut request, "profile", &cleaned(&[("name", json!("Jo"))]))
			.await
			.unwrap();

		assert_eq!(request.session.get("profile"), Some(&json!({"name": "Jo"})));
	}

	#[tokio::test]
	async fn test_add_session_backend_merges() {
		let mut request = FormRequest::default();

		AddSessionBackend
			.process(&mut request, "profile", &cleaned(&[("name", json!("Jo"))]))
			.await
			.unwrap();
		AddSessionBackend
			.process(
				&mut request,
				"profile",
				&cleaned(&[("age", json!(30)), ("name", json!("Jo Bloggs"))]),
			)
			.await
			.unwrap();

		assert_eq!(
			request.session.get("profile"),
			Some(&json!({"name": "Jo Bloggs", "age": 30}))
		);
	}

	#[tokio::test]
	async fn test_add_session_backend_rejects_non_object_entry() {
		let mut request = FormRequest::default();
		request.session.set("profile", json!("not an object"));

		let result = AddSessionBackend
			.process(&mut request, "profile", &cleaned(&[("name", json!("Jo"))]))
			.await;

		assert!(matches!(result, Err(BackendError::Session(_))));
	}

	#[tokio::test]
	async fn test_log_backend_writes_audit_line() {
		struct LogCapture {
			logs: Arc<Mutex<Vec<String>>>,
		}

		impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
			fn on_event(
				&self,
				event: &tracing::Event<'_>,
				_ctx: tracing_subscriber::layer::Context<'_, S>,
			) {
				struct FieldVisitor {
					line: String,
				}

				impl tracing::field::Visit for FieldVisitor {
					fn record_debug(
						&mut self,
						field: &tracing::field::Field,
						value: &dyn std::fmt::Debug,
					) {
						self.line.push_str(&format!(" {}={:?}", field.name(), value));
					}
				}

				let mut visitor = FieldVisitor {
					line: String::new(),
				};
				event.record(&mut visitor);
				self.logs.lock().unwrap().push(format!(
					"[{}]{}",
					event.metadata().level(),
					visitor.line
				));
			}
		}

		// Arrange
		let logs = Arc::new(Mutex::new(Vec::new()));
		let capture = LogCapture { logs: logs.clone() };
		let _guard = tracing_subscriber::registry().with(capture).set_default();
		let mut request = FormRequest::default();

		// Act
		LogBackend
			.process(
				&mut request,
				"feedback",
				&cleaned(&[("satisfaction", json!("Satisfied"))]),
			)
			.await
			.unwrap();

		// Assert
		let captured = logs.lock().unwrap();
		assert!(
			captured.iter().any(|line| line.contains("INFO")
				&& line.contains("feedback")
				&& line.contains("Satisfied")),
			"Expected audit line, got: {:?}",
			*captured
		);
	}
}
