//! The field contract shared by every input type

use crate::data::RawValue;
use async_trait::async_trait;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str = "Select a valid choice.";

/// Failures while cleaning a field.
///
/// Validation problems are not errors: they are recorded on the field and
/// read back through [`FormField::error`].
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
	#[error("Failed to store upload for '{field}': {source}")]
	Storage {
		field: String,
		#[source]
		source: formulary_storages::StorageError,
	},
}

pub type FieldResult<T> = Result<T, FieldError>;

/// State common to every field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBase {
	pub name: String,
	pub label: String,
	pub hint: String,
	pub required: bool,
	pub value: RawValue,
	/// Empty when valid
	pub error: String,
}

impl FieldBase {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: String::new(),
			hint: String::new(),
			required: true,
			value: RawValue::Empty,
			error: String::new(),
		}
	}
}

/// Anchor id for a field name: lower-cased, with every character that is
/// not alphanumeric replaced by `-`.
///
/// # Examples
///
/// ```
/// use formulary_forms::field::field_id;
///
/// assert_eq!(field_id("Date_of_Birth"), "date-of-birth");
/// assert_eq!(field_id("sex-block"), "sex-block");
/// ```
pub fn field_id(name: &str) -> String {
	name.chars()
		.map(|c| {
			if c.is_alphanumeric() {
				c.to_lowercase().next().unwrap_or(c)
			} else {
				'-'
			}
		})
		.collect()
}

/// A single named, validated input.
///
/// Implementors supply [`check`](Self::check) and [`clean`](Self::clean);
/// assigning a value through [`set_value`](Self::set_value) runs the
/// required check first and only then the variant rule.
#[async_trait]
pub trait FormField: Send + Sync {
	fn base(&self) -> &FieldBase;

	fn base_mut(&mut self) -> &mut FieldBase;

	/// The variant rule, run only on a value that is not missing.
	///
	/// Returns the error message, or `None` when the value is acceptable.
	fn check(&self, raw: &RawValue) -> Option<String>;

	/// The typed value; JSON `null` when nothing was submitted
	async fn clean(&self) -> FieldResult<serde_json::Value>;

	/// Whether `raw` counts as "nothing submitted"
	fn is_missing(&self, raw: &RawValue) -> bool {
		raw.is_blank()
	}

	/// Fields nested under the currently selected choices
	fn revealed(&self) -> Vec<&dyn FormField> {
		Vec::new()
	}

	/// Assign a submitted value and recompute the error from scratch
	fn set_value(&mut self, raw: RawValue) {
		let error = if self.is_missing(&raw) {
			if self.required() {
				Some(REQUIRED_MESSAGE.to_string())
			} else {
				None
			}
		} else {
			self.check(&raw)
		};

		let base = self.base_mut();
		base.value = raw;
		base.error = error.unwrap_or_default();
	}

	/// Assign a value without validating it
	fn prefill(&mut self, raw: RawValue) {
		let base = self.base_mut();
		base.value = raw;
		base.error.clear();
	}

	fn name(&self) -> &str {
		&self.base().name
	}

	fn label(&self) -> &str {
		&self.base().label
	}

	fn hint(&self) -> &str {
		&self.base().hint
	}

	fn required(&self) -> bool {
		self.base().required
	}

	fn value(&self) -> &RawValue {
		&self.base().value
	}

	fn error(&self) -> &str {
		&self.base().error
	}

	fn id(&self) -> String {
		field_id(self.name())
	}

	fn with_label(mut self, label: impl Into<String>) -> Self
	where
		Self: Sized,
	{
		self.base_mut().label = label.into();
		self
	}

	fn with_hint(mut self, hint: impl Into<String>) -> Self
	where
		Self: Sized,
	{
		self.base_mut().hint = hint.into();
		self
	}

	/// Accept a missing value
	fn optional(mut self) -> Self
	where
		Self: Sized,
	{
		self.base_mut().required = false;
		self
	}
}

impl std::fmt::Debug for dyn FormField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormField")
			.field("name", &self.name())
			.field("value", self.value())
			.field("error", &self.error())
			.finish()
	}
}
