//! # Formulary
//!
//! Declarative single-page forms and multi-step wizards with validation,
//! error summaries and pluggable backends.
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |---|---|
//! | [`forms`] | fields, fieldsets, forms, the backend contract, wizards |
//! | [`sessions`] | per-browser session storage |
//! | [`storages`] | content store for uploaded files |
//! | [`notify`] | email notifications through GOV.UK Notify |
//! | [`conf`] | settings from the environment |
//! | [`backends`] | database, email and HTTP-forward backends (feature `backends`) |
//!
//! ## Feature Flags
//!
//! - `full` (default): everything
//! - `backends`: the outbound backends and the [`Service`] helpers that build them
//!
//! ## Quick Example
//!
//! ```
//! use formulary::prelude::*;
//! use http::Method;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut service = Service::new(Settings::default());
//! service.register_wizard("equality", |_| {
//!     Wizard::builder("equality")
//!         .base_url("/questions/equality")
//!         .question(Question::new("permission").field(Radios::new("permission", ["yes", "no"])))
//!         .question(
//!             Question::new("health")
//!                 .field(Radios::new("health", ["yes", "no"]))
//!                 .when("permission", "yes"),
//!         )
//!         .success_url("/questions/equality/done")
//!         .build()
//! });
//!
//! let response = service
//!     .wizard(Method::POST, "equality", Some(0), None, FormData::new().with("permission", "yes"))
//!     .await
//!     .unwrap();
//! assert_eq!(response.location.as_deref(), Some("/questions/equality/1"));
//! # }
//! ```

pub mod service;

pub use formulary_conf as conf;
pub use formulary_forms as forms;
pub use formulary_notify as notify;
pub use formulary_sessions as sessions;
pub use formulary_storages as storages;

#[cfg(feature = "backends")]
pub use formulary_backends as backends;

pub use formulary_conf::{Settings, SettingsError};
pub use service::{FormFactory, Response, Service, ServiceError, ServiceResult, WizardFactory};

pub mod prelude {
	pub use crate::service::{Response, Service, ServiceError};
	pub use formulary_conf::Settings;
	pub use formulary_forms::{
		AddSessionBackend, Backend, BackendError, Checkboxes, Choice, DateInput, DecimalInput,
		EmailInput, FileUpload, Fieldset, Form, FormData, FormError, FormField, FormRequest,
		LogBackend, NumberInput, Question, Radios, RawValue, Redirect, RegexInput, Select,
		SessionBackend, StepOutcome, TextInput, UploadedFile, Wizard, WizardError,
	};
	pub use formulary_notify::{MemoryNotifier, Notifier, NotifyClient};
	pub use formulary_sessions::{InMemorySessionStore, Session, SessionStore};
	pub use formulary_storages::{LocalStorage, MemoryStorage, StorageBackend};

	#[cfg(feature = "backends")]
	pub use formulary_backends::{ApiBackend, DatabaseBackend, EmailBackend};
}
