//! Email address input

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField};
use crate::fields::text::clean_text;
use async_trait::async_trait;
use serde_json::Value;

pub const NOT_AN_EMAIL_MESSAGE: &str = "Value is not an email.";

/// The address part of `Display Name <address>`, or the whole value
fn address(value: &str) -> &str {
	let value = value.trim();
	match (value.rfind('<'), value.rfind('>')) {
		(Some(start), Some(end)) if start < end => value[start + 1..end].trim(),
		_ => value,
	}
}

/// Email address input.
///
/// The check is deliberately loose: the address must contain `@`.
///
/// # Examples
///
/// ```
/// use formulary_forms::{EmailInput, FormField, RawValue};
///
/// let mut field = EmailInput::new("email");
/// field.set_value(RawValue::from("Jo Bloggs <jo@example.com>"));
/// assert_eq!(field.error(), "");
///
/// field.set_value(RawValue::from("jo.example.com"));
/// assert_eq!(field.error(), "Value is not an email.");
/// ```
#[derive(Debug, Clone)]
pub struct EmailInput {
	base: FieldBase,
}

impl EmailInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			base: FieldBase::new(name),
		}
	}
}

#[async_trait]
impl FormField for EmailInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		let valid = raw.text().is_some_and(|v| address(v).contains('@'));
		(!valid).then(|| NOT_AN_EMAIL_MESSAGE.to_string())
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(clean_text(&self.base.value))
	}
}
