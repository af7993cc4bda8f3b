//! Form and wizard registry with request entry points
//!
//! A [`Service`] maps names to factories that build a fresh [`Form`] or
//! [`Wizard`] for every request. The entry points load the caller's session,
//! drive the form or wizard and save the session back.

use formulary_conf::Settings;
use formulary_forms::{
	Form, FormData, FormError, FormRequest, Page, StepOutcome, Wizard, WizardError,
};
use formulary_notify::{Notifier, NotifyClient};
use formulary_sessions::{InMemorySessionStore, Session, SessionId, SessionStore};
use formulary_storages::{LocalStorage, StorageBackend};
use http::{Method, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "backends")]
use formulary_backends::{DatabaseBackend, EmailBackend};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Method not allowed: {0}")]
	MethodNotAllowed(Method),

	#[error(transparent)]
	Form(#[from] FormError),

	#[error(transparent)]
	Wizard(#[from] WizardError),

	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl ServiceError {
	/// HTTP status to answer with
	///
	/// # Examples
	///
	/// ```
	/// use formulary::ServiceError;
	/// use http::StatusCode;
	///
	/// let error = ServiceError::NotFound("form 'missing'".to_string());
	/// assert_eq!(error.status(), StatusCode::NOT_FOUND);
	/// ```
	pub fn status(&self) -> StatusCode {
		match self {
			ServiceError::NotFound(_) | ServiceError::Wizard(WizardError::NotFound { .. }) => {
				StatusCode::NOT_FOUND
			}
			ServiceError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type FormFactory = Arc<dyn Fn(&Service) -> Result<Form, FormError> + Send + Sync>;
pub type WizardFactory = Arc<dyn Fn(&Service) -> Result<Wizard, FormError> + Send + Sync>;

/// What to send back to the browser
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
	pub status: StatusCode,
	/// Redirect target, set for 3xx responses
	pub location: Option<String>,
	/// Page to render, set for 200 responses
	pub page: Option<Page>,
	/// Session to hand back in a cookie
	pub session_id: SessionId,
}

impl Response {
	fn page(page: Page, session_id: SessionId) -> Self {
		Self {
			status: StatusCode::OK,
			location: None,
			page: Some(page),
			session_id,
		}
	}

	fn redirect(redirect: formulary_forms::Redirect, session_id: SessionId) -> Self {
		Self {
			status: redirect.status,
			location: Some(redirect.location),
			page: None,
			session_id,
		}
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}

/// A registry of forms and wizards sharing settings, sessions and a notifier.
///
/// # Examples
///
/// ```
/// use formulary::{Service, Settings};
/// use formulary_forms::{Form, FormData, FormField, TextInput};
/// use http::{Method, StatusCode};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut service = Service::new(Settings::default());
/// service.register_form("contact", |_| {
///     Form::builder("contact")
///         .field(TextInput::new("message").with_label("Your message"))
///         .success_url("/contact/sent")
///         .build()
/// });
///
/// let response = service
///     .form(Method::POST, "contact", None, FormData::new().with("message", "Hello"))
///     .await
///     .unwrap();
/// assert_eq!(response.status, StatusCode::SEE_OTHER);
/// assert_eq!(response.location.as_deref(), Some("/contact/sent"));
/// # }
/// ```
pub struct Service {
	settings: Settings,
	sessions: Arc<dyn SessionStore>,
	notifier: Option<Arc<dyn Notifier>>,
	storage: Option<Arc<dyn StorageBackend>>,
	forms: HashMap<String, FormFactory>,
	wizards: HashMap<String, WizardFactory>,
	#[cfg(feature = "backends")]
	database: Option<Arc<DatabaseBackend>>,
}

impl std::fmt::Debug for Service {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut forms: Vec<&String> = self.forms.keys().collect();
		forms.sort();
		let mut wizards: Vec<&String> = self.wizards.keys().collect();
		wizards.sort();
		f.debug_struct("Service")
			.field("settings", &self.settings)
			.field("forms", &forms)
			.field("wizards", &wizards)
			.field("notifier", &self.notifier.is_some())
			.field("storage", &self.storage.is_some())
			.finish_non_exhaustive()
	}
}

impl Service {
	/// A service with in-memory sessions and no notifier
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			sessions: Arc::new(InMemorySessionStore::new()),
			notifier: None,
			storage: None,
			forms: HashMap::new(),
			wizards: HashMap::new(),
			#[cfg(feature = "backends")]
			database: None,
		}
	}

	/// A service wired from settings: a Notify client when `NOTIFY_API_KEY`
	/// is set.
	pub fn from_settings(settings: Settings) -> ServiceResult<Self> {
		let notifier = match &settings.notify_api_key {
			Some(key) => {
				let client = NotifyClient::new(key)
					.map_err(|e| ServiceError::Configuration(e.to_string()))?;
				Some(Arc::new(client) as Arc<dyn Notifier>)
			}
			None => None,
		};
		let mut service = Self::new(settings);
		service.notifier = notifier;
		Ok(service)
	}

	pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
		self.sessions = sessions;
		self
	}

	pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
		self.notifier = Some(notifier);
		self
	}

	/// Content store to use instead of a [`LocalStorage`] under `MEDIA_ROOT`
	pub fn with_storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Content store for uploads, for use in factories.
	///
	/// Unless one was given with [`with_storage`](Self::with_storage), this is
	/// a [`LocalStorage`] rooted at `MEDIA_ROOT`. In dev mode a missing
	/// directory is created; otherwise it must already exist.
	///
	/// # Examples
	///
	/// ```
	/// use formulary::{Service, Settings};
	///
	/// let settings = Settings {
	///     media_root: "/nonexistent/formulary-media".into(),
	///     dev_mode: false,
	///     ..Settings::default()
	/// };
	/// assert!(Service::new(settings).storage().is_err());
	/// ```
	pub fn storage(&self) -> ServiceResult<Arc<dyn StorageBackend>> {
		if let Some(storage) = &self.storage {
			return Ok(storage.clone());
		}

		let root = &self.settings.media_root;
		if self.settings.dev_mode && !root.exists() {
			std::fs::create_dir_all(root).map_err(|e| {
				ServiceError::Configuration(format!("cannot create {}: {}", root.display(), e))
			})?;
			tracing::info!(media_root = %root.display(), "created upload directory");
		}
		let storage =
			LocalStorage::new(root).map_err(|e| ServiceError::Configuration(e.to_string()))?;
		Ok(Arc::new(storage))
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn sessions(&self) -> &Arc<dyn SessionStore> {
		&self.sessions
	}

	pub fn notifier(&self) -> Option<&Arc<dyn Notifier>> {
		self.notifier.as_ref()
	}

	pub fn register_form<F>(&mut self, name: impl Into<String>, factory: F)
	where
		F: Fn(&Service) -> Result<Form, FormError> + Send + Sync + 'static,
	{
		self.forms.insert(name.into(), Arc::new(factory));
	}

	pub fn register_wizard<F>(&mut self, name: impl Into<String>, factory: F)
	where
		F: Fn(&Service) -> Result<Wizard, FormError> + Send + Sync + 'static,
	{
		self.wizards.insert(name.into(), Arc::new(factory));
	}

	/// Registered form names, sorted
	pub fn forms(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.forms.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Registered wizard names, sorted
	pub fn wizards(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.wizards.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	async fn open_session(&self, session_id: Option<&str>) -> (SessionId, Session) {
		match session_id {
			Some(id) => {
				let id = id.to_string();
				let session = self.sessions.load(&id).await.unwrap_or_default();
				(id, session)
			}
			None => (self.sessions.create_session_id(), Session::new()),
		}
	}

	fn build_form(&self, name: &str) -> ServiceResult<Form> {
		let Some(factory) = self.forms.get(name) else {
			tracing::warn!(form = name, "unknown form requested");
			return Err(ServiceError::NotFound(format!("form '{}'", name)));
		};
		Ok(factory(self)?)
	}

	fn build_wizard(&self, name: &str) -> ServiceResult<Wizard> {
		let Some(factory) = self.wizards.get(name) else {
			tracing::warn!(wizard = name, "unknown wizard requested");
			return Err(ServiceError::NotFound(format!("wizard '{}'", name)));
		};
		Ok(factory(self)?)
	}

	/// Handle a request for a single-page form.
	///
	/// GET renders the empty form. POST binds `data`; a valid form is
	/// processed and redirected, an invalid one rendered with its errors.
	pub async fn form(
		&self,
		method: Method,
		name: &str,
		session_id: Option<&str>,
		data: FormData,
	) -> ServiceResult<Response> {
		let mut form = self.build_form(name)?;
		let (session_id, session) = self.open_session(session_id).await;

		match method {
			Method::GET => Ok(Response::page(form.view(), session_id)),
			Method::POST => {
				form.bind(data.clone());
				if !form.valid() {
					return Ok(Response::page(form.view(), session_id));
				}

				let mut request = FormRequest::new(data, session);
				let redirect = form.process(&mut request).await?;
				self.sessions.save(&session_id, &request.session).await;
				Ok(Response::redirect(redirect, session_id))
			}
			other => Err(ServiceError::MethodNotAllowed(other)),
		}
	}

	/// Handle a request for a wizard step.
	///
	/// A GET without a step redirects to the first question; a POST without a
	/// step answers it.
	pub async fn wizard(
		&self,
		method: Method,
		name: &str,
		step: Option<usize>,
		session_id: Option<&str>,
		data: FormData,
	) -> ServiceResult<Response> {
		let mut wizard = self.build_wizard(name)?;
		let (session_id, session) = self.open_session(session_id).await;

		match method {
			Method::GET => match step {
				None => Ok(Response::redirect(
					formulary_forms::Redirect::temporary(wizard.step_url(0)),
					session_id,
				)),
				Some(step) => Ok(Response::page(wizard.get(step, &session)?, session_id)),
			},
			Method::POST => {
				let mut request = FormRequest::new(data, session);
				let outcome = wizard.post(step.unwrap_or(0), &mut request).await?;
				self.sessions.save(&session_id, &request.session).await;
				Ok(match outcome {
					StepOutcome::Invalid(page) => Response::page(page, session_id),
					StepOutcome::Next(redirect) | StepOutcome::Finished(redirect) => {
						Response::redirect(redirect, session_id)
					}
				})
			}
			other => Err(ServiceError::MethodNotAllowed(other)),
		}
	}
}

#[cfg(feature = "backends")]
impl Service {
	/// Open the submissions database named by `DATABASE_URL`
	pub async fn connect_database(&mut self) -> ServiceResult<()> {
		let database = DatabaseBackend::connect(&self.settings.database_url)
			.await
			.map_err(|e| ServiceError::Configuration(e.to_string()))?;
		self.database = Some(Arc::new(database));
		Ok(())
	}

	pub fn with_database(mut self, database: Arc<DatabaseBackend>) -> Self {
		self.database = Some(database);
		self
	}

	/// The shared database backend, for use in factories
	pub fn database_backend(&self) -> ServiceResult<Arc<DatabaseBackend>> {
		self.database
			.clone()
			.ok_or_else(|| ServiceError::Configuration("Database not connected.".to_string()))
	}

	/// An email backend sending through the configured notifier
	pub fn email_backend(
		&self,
		template_id: &str,
		email_address: &str,
	) -> ServiceResult<EmailBackend> {
		let notifier = self.notifier.clone().ok_or_else(|| {
			ServiceError::Configuration("NOTIFY_API_KEY not configured.".to_string())
		})?;
		EmailBackend::new(
			notifier,
			template_id,
			email_address,
			self.settings.service_name.clone(),
		)
		.map_err(|e| ServiceError::Configuration(e.to_string()))
	}
}
