//! Free text input

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField};
use async_trait::async_trait;
use serde_json::Value;

/// Free text, optionally limited by characters or words.
///
/// Both limits count the value as submitted. When both are exceeded the
/// word limit message is reported.
///
/// # Examples
///
/// ```
/// use formulary_forms::{FormField, RawValue, TextInput};
///
/// let mut field = TextInput::new("summary").with_max_words(3);
/// field.set_value(RawValue::from("one two three four"));
/// assert_eq!(field.error(), "Words exceed limit of 3.");
/// ```
#[derive(Debug, Clone)]
pub struct TextInput {
	base: FieldBase,
	pub max_chars: Option<usize>,
	pub max_words: Option<usize>,
}

impl TextInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			base: FieldBase::new(name),
			max_chars: None,
			max_words: None,
		}
	}

	pub fn with_max_chars(mut self, limit: usize) -> Self {
		self.max_chars = Some(limit);
		self
	}

	pub fn with_max_words(mut self, limit: usize) -> Self {
		self.max_words = Some(limit);
		self
	}
}

/// Trimmed text of a field value, `null` when blank
pub(crate) fn clean_text(raw: &RawValue) -> Value {
	match raw.text().map(str::trim) {
		Some(text) if !text.is_empty() => Value::String(text.to_string()),
		_ => Value::Null,
	}
}

#[async_trait]
impl FormField for TextInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		let text = raw.text().unwrap_or_default();
		let mut error = None;

		if let Some(limit) = self.max_chars
			&& text.chars().count() > limit
		{
			error = Some(format!("Characters exceed limit of {}.", limit));
		}

		if let Some(limit) = self.max_words
			&& text.split_whitespace().count() > limit
		{
			error = Some(format!("Words exceed limit of {}.", limit));
		}

		error
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(clean_text(&self.base.value))
	}
}
