//! # Formulary Backends
//!
//! Backends that send form data out of the process.
//!
//! - [`DatabaseBackend`]: appends each submission to a SQLite `forms` table
//! - [`EmailBackend`]: emails the submission through a [`formulary_notify::Notifier`]
//! - [`ApiBackend`]: forwards the submission to an HTTP endpoint under basic auth
//!
//! Every backend reports failure as a [`BackendError`]; none of them retries.
//!
//! ## Example
//!
//! ```
//! use formulary_backends::EmailBackend;
//! use formulary_forms::{Form, FormField, TextInput};
//! use formulary_notify::MemoryNotifier;
//! use std::sync::Arc;
//!
//! let email = EmailBackend::new(
//!     Arc::new(MemoryNotifier::new()),
//!     "3c8d7f9e-0000-4000-8000-000000000000",
//!     "team@example.gov.uk",
//!     "Apply for a licence",
//! )
//! .unwrap();
//!
//! let form = Form::builder("contact")
//!     .field(TextInput::new("message"))
//!     .backend(Arc::new(email))
//!     .build()
//!     .unwrap();
//! # let _ = form;
//! ```

pub mod api;
pub mod database;
pub mod email;

pub use api::ApiBackend;
pub use database::{DatabaseBackend, Submission};
pub use email::EmailBackend;

pub use formulary_forms::{BackendError, BackendResult};

use serde_json::Value;

/// Plain-text rendering of a clean value: strings without quotes, `null` as
/// nothing and lists joined with commas
pub(crate) fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items
			.iter()
			.map(display_value)
			.collect::<Vec<_>>()
			.join(", "),
		other => other.to_string(),
	}
}
