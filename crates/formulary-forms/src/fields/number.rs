//! Numeric inputs

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField};
use async_trait::async_trait;
use serde_json::Value;

pub const NOT_A_NUMBER_MESSAGE: &str = "Value is not a number.";

fn parse_integer(raw: &RawValue) -> Option<i64> {
	raw.text()?.trim().parse().ok()
}

fn parse_decimal(raw: &RawValue) -> Option<f64> {
	raw.text()?
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|n| n.is_finite())
}

/// Whole number input; cleans to a JSON integer
#[derive(Debug, Clone)]
pub struct NumberInput {
	base: FieldBase,
}

impl NumberInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			base: FieldBase::new(name),
		}
	}
}

#[async_trait]
impl FormField for NumberInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		parse_integer(raw)
			.is_none()
			.then(|| NOT_A_NUMBER_MESSAGE.to_string())
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(parse_integer(&self.base.value).map_or(Value::Null, Value::from))
	}
}

/// Decimal input; cleans to a JSON float.
///
/// `prefix` is display only (e.g. `£`); it is not stripped from the value.
///
/// # Examples
///
/// ```
/// use formulary_forms::{DecimalInput, FormField, RawValue};
///
/// let mut field = DecimalInput::gbp("income");
/// assert_eq!(field.prefix.as_deref(), Some("£"));
///
/// field.set_value(RawValue::from("1250.50"));
/// assert_eq!(field.error(), "");
/// ```
#[derive(Debug, Clone)]
pub struct DecimalInput {
	base: FieldBase,
	pub prefix: Option<String>,
}

impl DecimalInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			base: FieldBase::new(name),
			prefix: None,
		}
	}

	/// Amount in pounds sterling
	pub fn gbp(name: impl Into<String>) -> Self {
		Self::new(name).with_prefix("£")
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}
}

#[async_trait]
impl FormField for DecimalInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		parse_decimal(raw)
			.is_none()
			.then(|| NOT_A_NUMBER_MESSAGE.to_string())
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(parse_decimal(&self.base.value).map_or(Value::Null, Value::from))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::REQUIRED_MESSAGE;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("42", "")]
	#[case(" -7 ", "")]
	#[case("+3", "")]
	#[case("4.2", NOT_A_NUMBER_MESSAGE)]
	#[case("four", NOT_A_NUMBER_MESSAGE)]
	#[case("", REQUIRED_MESSAGE)]
	fn test_number_input(#[case] raw: &str, #[case] expected: &str) {
		let mut field = NumberInput::new("age");
		field.set_value(RawValue::from(raw));
		assert_eq!(field.error(), expected);
	}

	#[rstest]
	#[case("4.2", "")]
	#[case("10", "")]
	#[case("1e3", "")]
	#[case("inf", NOT_A_NUMBER_MESSAGE)]
	#[case("NaN", NOT_A_NUMBER_MESSAGE)]
	#[case("£10", NOT_A_NUMBER_MESSAGE)]
	fn test_decimal_input(#[case] raw: &str, #[case] expected: &str) {
		let mut field = DecimalInput::new("amount");
		field.set_value(RawValue::from(raw));
		assert_eq!(field.error(), expected);
	}

	#[tokio::test]
	async fn test_number_clean() {
		let mut field = NumberInput::new("age");
		field.set_value(RawValue::from(" 30 "));
		assert_eq!(field.clean().await.unwrap(), json!(30));
	}

	#[tokio::test]
	async fn test_decimal_clean() {
		let mut field = DecimalInput::gbp("income");
		field.set_value(RawValue::from("1250.5"));
		assert_eq!(field.clean().await.unwrap(), json!(1250.5));
	}

	#[tokio::test]
	async fn test_optional_number_missing_is_null() {
		let mut field = NumberInput::new("children").optional();
		field.set_value(RawValue::Empty);
		assert_eq!(field.error(), "");
		assert_eq!(field.clean().await.unwrap(), Value::Null);
	}
}
