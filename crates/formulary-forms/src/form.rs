//! Single-page forms

use crate::backend::{Backend, BackendError, FormRequest, SessionBackend};
use crate::data::{CleanedData, FormData};
use crate::field::{FieldError, FormField};
use crate::fieldset::{Fieldset, Items};
use crate::response::Redirect;
use crate::view::{ErrorSummary, Page};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error(transparent)]
	Field(#[from] FieldError),

	#[error(transparent)]
	Backend(#[from] BackendError),
}

pub type FormResult<T> = Result<T, FormError>;

type SuccessFn = Arc<dyn Fn(&FormData) -> String + Send + Sync>;

/// Where a form sends the browser once it has been processed
#[derive(Clone)]
pub enum SuccessTarget {
	Url(String),
	/// Computed from the submitted data
	Dynamic(SuccessFn),
}

impl SuccessTarget {
	pub fn resolve(&self, data: &FormData) -> String {
		match self {
			SuccessTarget::Url(url) => url.clone(),
			SuccessTarget::Dynamic(f) => f(data),
		}
	}
}

impl std::fmt::Debug for SuccessTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SuccessTarget::Url(url) => f.debug_tuple("Url").field(url).finish(),
			SuccessTarget::Dynamic(_) => f.write_str("Dynamic(..)"),
		}
	}
}

impl Default for SuccessTarget {
	fn default() -> Self {
		SuccessTarget::Url("/".to_string())
	}
}

pub(crate) async fn run_backends(
	backends: &[Arc<dyn Backend>],
	request: &mut FormRequest,
	name: &str,
	data: &CleanedData,
) -> Result<(), BackendError> {
	for backend in backends {
		if let Err(e) = backend.process(request, name, data).await {
			tracing::error!(form = name, error = %e, "backend failed");
			return Err(e);
		}
	}
	Ok(())
}

/// A named page of fields with the backends that receive its data.
///
/// Forms are rebuilt for every request, bound once and then processed.
///
/// # Examples
///
/// ```
/// use formulary_forms::{Form, FormData, FormField, TextInput, EmailInput};
///
/// let mut form = Form::builder("contact")
///     .title("Contact us")
///     .field(TextInput::new("name").with_label("Your name"))
///     .field(EmailInput::new("email").with_label("Email address"))
///     .success_url("/contact/thanks")
///     .build()
///     .unwrap();
///
/// form.bind(FormData::new().with("name", "Jo"));
/// assert!(!form.valid());
/// assert_eq!(form.errors()["email"], "This field is required.");
/// ```
#[derive(Debug)]
pub struct Form {
	name: String,
	title: String,
	items: Items,
	backends: Vec<Arc<dyn Backend>>,
	success: SuccessTarget,
	cta: String,
	method: String,
	action: String,
	data: FormData,
}

impl Form {
	pub fn builder(name: impl Into<String>) -> FormBuilder {
		FormBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn items(&self) -> &Items {
		&self.items
	}

	/// The bound data, empty until [`bind`](Self::bind) is called
	pub fn data(&self) -> &FormData {
		&self.data
	}

	pub fn fields(&self) -> impl Iterator<Item = &dyn FormField> {
		self.items.fields()
	}

	pub fn field(&self, name: &str) -> Option<&dyn FormField> {
		self.items.field(name)
	}

	/// Assign submitted values to every field, fieldsets included.
	///
	/// A name missing from `data` is treated as an empty submission.
	pub fn bind(&mut self, data: FormData) {
		self.items.bind(&data);
		self.data = data;
	}

	pub fn valid(&self) -> bool {
		self.items.valid()
	}

	pub fn errors(&self) -> IndexMap<String, String> {
		self.items.errors()
	}

	pub async fn clean(&self) -> FormResult<CleanedData> {
		Ok(self.items.clean().await?)
	}

	/// Clean the bound data once, run every backend in order, then redirect.
	///
	/// Call this only on a valid form. The first backend failure stops the
	/// chain; earlier backends are not rolled back.
	pub async fn process(&self, request: &mut FormRequest) -> FormResult<Redirect> {
		let cleaned = self.clean().await?;
		run_backends(&self.backends, request, &self.name, &cleaned).await?;
		Ok(self.success())
	}

	pub fn error_summary(&self) -> Option<ErrorSummary> {
		self.items.error_summary()
	}

	pub fn success(&self) -> Redirect {
		Redirect::see_other(self.success.resolve(&self.data))
	}

	pub fn view(&self) -> Page {
		Page {
			title: self.title.clone(),
			form_name: self.name.clone(),
			method: self.method.clone(),
			action: self.action.clone(),
			cta: self.cta.clone(),
			error_summary: self.error_summary(),
			errors: self.errors(),
			items: self.items.view(),
		}
	}
}

/// Builder for [`Form`]
pub struct FormBuilder {
	name: String,
	title: String,
	items: Items,
	backends: Vec<Arc<dyn Backend>>,
	success: SuccessTarget,
	cta: String,
	method: String,
	action: String,
}

impl FormBuilder {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: String::new(),
			items: Items::default(),
			backends: Vec::new(),
			success: SuccessTarget::default(),
			cta: "Submit".to_string(),
			method: "post".to_string(),
			action: String::new(),
		}
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.items.push_field(Box::new(field));
		self
	}

	pub fn fieldset(mut self, fieldset: Fieldset) -> Self {
		self.items.push_fieldset(fieldset);
		self
	}

	pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
		self.backends.push(backend);
		self
	}

	pub fn success_url(mut self, url: impl Into<String>) -> Self {
		self.success = SuccessTarget::Url(url.into());
		self
	}

	pub fn success_with<F>(mut self, f: F) -> Self
	where
		F: Fn(&FormData) -> String + Send + Sync + 'static,
	{
		self.success = SuccessTarget::Dynamic(Arc::new(f));
		self
	}

	pub fn cta(mut self, cta: impl Into<String>) -> Self {
		self.cta = cta.into();
		self
	}

	pub fn method(mut self, method: impl Into<String>) -> Self {
		self.method = method.into();
		self
	}

	pub fn action(mut self, action: impl Into<String>) -> Self {
		self.action = action.into();
		self
	}

	pub fn build(self) -> FormResult<Form> {
		if self.items.is_empty() {
			return Err(FormError::Configuration(format!(
				"form '{}' has no fields",
				self.name
			)));
		}

		let backends = if self.backends.is_empty() {
			vec![Arc::new(SessionBackend) as Arc<dyn Backend>]
		} else {
			self.backends
		};

		Ok(Form {
			name: self.name,
			title: self.title,
			items: self.items,
			backends,
			success: self.success,
			cta: self.cta,
			method: self.method,
			action: self.action,
			data: FormData::new(),
		})
	}
}
