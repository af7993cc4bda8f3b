//! Pattern-constrained text input

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField};
use crate::fields::text::clean_text;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

pub const FORMAT_MESSAGE: &str = "Value does not match the required format.";

/// Text that must match a pattern starting at the first character.
///
/// The match is anchored at the start only; add `$` to the pattern to
/// constrain the whole value.
///
/// # Examples
///
/// ```
/// use formulary_forms::{FormField, RawValue, RegexInput};
///
/// let mut field = RegexInput::with_pattern("postcode", r"[A-Z]{1,2}[0-9]").unwrap();
///
/// field.set_value(RawValue::from("SW1A 1AA"));
/// assert_eq!(field.error(), "");
///
/// field.set_value(RawValue::from("my postcode is SW1A 1AA"));
/// assert_eq!(field.error(), "Value does not match the required format.");
/// ```
#[derive(Debug, Clone)]
pub struct RegexInput {
	base: FieldBase,
	pub regex: Regex,
}

impl RegexInput {
	pub fn new(name: impl Into<String>, regex: Regex) -> Self {
		Self {
			base: FieldBase::new(name),
			regex,
		}
	}

	pub fn with_pattern(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self::new(name, Regex::new(pattern)?))
	}

	fn matches(&self, value: &str) -> bool {
		// the leftmost match starts at 0 whenever any match does
		self.regex.find(value).is_some_and(|m| m.start() == 0)
	}
}

#[async_trait]
impl FormField for RegexInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		let valid = raw.text().is_some_and(|v| self.matches(v));
		(!valid).then(|| FORMAT_MESSAGE.to_string())
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(clean_text(&self.base.value))
	}
}
