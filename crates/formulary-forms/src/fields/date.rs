//! Composite day/month/year input

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::Value;

pub const INVALID_DATE_MESSAGE: &str = "Invalid values.";
pub const PAST_DATE_MESSAGE: &str = "The date must be in the past.";
pub const FUTURE_DATE_MESSAGE: &str = "The date must be in the future.";

/// Which dates are acceptable relative to today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateConstraint {
	#[default]
	Any,
	/// Today or earlier
	Past,
	/// Today or later
	Future,
}

/// Day, month and year submitted as three values under one name
fn parts(raw: &RawValue) -> [&str; 3] {
	let mut parts = [""; 3];
	for (slot, value) in parts.iter_mut().zip(raw.values()) {
		*slot = value.trim();
	}
	parts
}

fn parse_date(raw: &RawValue) -> Option<NaiveDate> {
	let values = raw.values();
	if values.len() != 3 {
		return None;
	}
	let [day, month, year] = parts(raw);
	let day: u32 = day.parse().ok()?;
	let month: u32 = month.parse().ok()?;
	let year: i32 = year.parse().ok()?;
	if !(1..=9999).contains(&year) {
		return None;
	}
	NaiveDate::from_ymd_opt(year, month, day)
}

/// GOV.UK style date input: separate day, month and year boxes.
///
/// A required date is missing when any part is blank. An optional date is
/// missing only when every part is blank; a partly filled optional date is
/// invalid.
///
/// # Examples
///
/// ```
/// use formulary_forms::{DateInput, FormField, RawValue};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut field = DateInput::new("dob");
/// field.set_value(RawValue::from(vec!["10", "10", "2000"]));
/// assert_eq!(field.error(), "");
/// assert_eq!(field.clean().await.unwrap(), "2000-10-10");
///
/// field.set_value(RawValue::from(vec!["foo", "10", "2000"]));
/// assert_eq!(field.error(), "Invalid values.");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DateInput {
	base: FieldBase,
	pub constraint: DateConstraint,
}

impl DateInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			base: FieldBase::new(name),
			constraint: DateConstraint::Any,
		}
	}

	/// A date that must not be after today
	pub fn past(name: impl Into<String>) -> Self {
		Self::new(name).with_constraint(DateConstraint::Past)
	}

	/// A date that must not be before today
	pub fn future(name: impl Into<String>) -> Self {
		Self::new(name).with_constraint(DateConstraint::Future)
	}

	pub fn with_constraint(mut self, constraint: DateConstraint) -> Self {
		self.constraint = constraint;
		self
	}

	/// The submitted day, month and year, blank where absent
	pub fn day_month_year(&self) -> [&str; 3] {
		parts(&self.base.value)
	}
}

#[async_trait]
impl FormField for DateInput {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn is_missing(&self, raw: &RawValue) -> bool {
		let parts = parts(raw);
		if self.required() {
			parts.iter().any(|p| p.is_empty())
		} else {
			parts.iter().all(|p| p.is_empty())
		}
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		let Some(date) = parse_date(raw) else {
			return Some(INVALID_DATE_MESSAGE.to_string());
		};

		let today = Local::now().date_naive();
		match self.constraint {
			DateConstraint::Past if date > today => Some(PAST_DATE_MESSAGE.to_string()),
			DateConstraint::Future if date < today => Some(FUTURE_DATE_MESSAGE.to_string()),
			_ => None,
		}
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(parse_date(&self.base.value)
			.map_or(Value::Null, |date| Value::String(date.format("%Y-%m-%d").to_string())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::REQUIRED_MESSAGE;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(vec!["10", "10", "2000"], "")]
	#[case(vec!["foo", "10", "2000"], INVALID_DATE_MESSAGE)]
	#[case(vec!["31", "2", "2001"], INVALID_DATE_MESSAGE)]
	#[case(vec!["29", "2", "2000"], "")]
	#[case(vec!["1", "13", "2000"], INVALID_DATE_MESSAGE)]
	#[case(vec!["", "10", "2000"], REQUIRED_MESSAGE)]
	#[case(vec!["", "", ""], REQUIRED_MESSAGE)]
	fn test_required_date(#[case] raw: Vec<&str>, #[case] expected: &str) {
		let mut field = DateInput::new("dob");
		field.set_value(RawValue::from(raw));
		assert_eq!(field.error(), expected);
	}

	#[test]
	fn test_required_date_absent() {
		let mut field = DateInput::new("dob");
		field.set_value(RawValue::Empty);
		assert_eq!(field.error(), REQUIRED_MESSAGE);
	}

	#[tokio::test]
	async fn test_optional_date_fully_empty() {
		let mut field = DateInput::new("dob").optional();
		field.set_value(RawValue::from(vec!["", "", ""]));
		assert_eq!(field.error(), "");
		assert_eq!(field.clean().await.unwrap(), Value::Null);
	}

	#[test]
	fn test_optional_date_partly_filled_is_invalid() {
		let mut field = DateInput::new("dob").optional();
		field.set_value(RawValue::from(vec!["10", "", ""]));
		assert_eq!(field.error(), INVALID_DATE_MESSAGE);
	}

	#[rstest]
	#[case(DateConstraint::Past, vec!["1", "1", "2000"], "")]
	#[case(DateConstraint::Past, vec!["1", "1", "9000"], PAST_DATE_MESSAGE)]
	#[case(DateConstraint::Future, vec!["1", "1", "9000"], "")]
	#[case(DateConstraint::Future, vec!["1", "1", "2000"], FUTURE_DATE_MESSAGE)]
	fn test_constraints(
		#[case] constraint: DateConstraint,
		#[case] raw: Vec<&str>,
		#[case] expected: &str,
	) {
		let mut field = DateInput::new("when").with_constraint(constraint);
		field.set_value(RawValue::from(raw));
		assert_eq!(field.error(), expected);
	}

	#[test]
	fn test_today_is_both_past_and_future() {
		let today = Local::now().date_naive();
		let raw = RawValue::from(vec![
			today.format("%d").to_string(),
			today.format("%m").to_string(),
			today.format("%Y").to_string(),
		]);

		let mut past = DateInput::past("when");
		past.set_value(raw.clone());
		let mut future = DateInput::future("when");
		future.set_value(raw);

		assert_eq!(past.error(), "");
		assert_eq!(future.error(), "");
	}

	#[tokio::test]
	async fn test_clean_iso_date() {
		let mut field = DateInput::new("dob");
		field.set_value(RawValue::from(vec![" 5 ", "3", "1999"]));
		assert_eq!(field.clean().await.unwrap(), json!("1999-03-05"));
		assert_eq!(field.day_month_year(), ["5", "3", "1999"]);
	}
}
