//! Single and multiple choice inputs
//!
//! Choices are declared either from plain labels, whose submitted value is
//! derived from the label, or as explicit `value -> label` pairs. Cleaning
//! returns labels so stored data stays readable.

use crate::data::RawValue;
use crate::field::{FieldBase, FieldResult, FormField, INVALID_CHOICE_MESSAGE};
use async_trait::async_trait;
use serde_json::Value;

/// Submitted value for a plain label: lower-cased words joined by `_`
///
/// # Examples
///
/// ```
/// use formulary_forms::fields::choice::value_for_label;
///
/// assert_eq!(value_for_label("Very satisfied"), "very_satisfied");
/// assert_eq!(value_for_label("  Yes "), "yes");
/// ```
pub fn value_for_label(label: &str) -> String {
	label
		.to_lowercase()
		.split_whitespace()
		.collect::<Vec<_>>()
		.join("_")
}

/// One option of a choice field
pub struct Choice {
	pub value: String,
	pub label: String,
	pub hint: String,
	/// Shown only while this choice is selected
	pub reveal: Option<Box<dyn FormField>>,
}

impl std::fmt::Debug for Choice {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Choice")
			.field("value", &self.value)
			.field("label", &self.label)
			.field("hint", &self.hint)
			.field("reveal", &self.reveal.as_ref().map(|field| field.name()))
			.finish()
	}
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			hint: String::new(),
			reveal: None,
		}
	}

	/// A choice whose value is derived from its label
	pub fn label(label: impl Into<String>) -> Self {
		let label = label.into();
		Self::new(value_for_label(&label), label)
	}

	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = hint.into();
		self
	}

	/// Nest a field under this choice
	pub fn with_reveal(mut self, field: impl FormField + 'static) -> Self {
		self.reveal = Some(Box::new(field));
		self
	}
}

impl From<&str> for Choice {
	fn from(label: &str) -> Self {
		Choice::label(label)
	}
}

/// Ordered choices shared by the choice fields
#[derive(Debug, Default)]
pub struct Choices(Vec<Choice>);

impl Choices {
	pub fn iter(&self) -> impl Iterator<Item = &Choice> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn find(&self, value: &str) -> Option<&Choice> {
		self.0.iter().find(|choice| choice.value == value)
	}

	fn all_known<'a>(&self, mut values: impl Iterator<Item = &'a str>) -> bool {
		values.all(|value| self.find(value).is_some())
	}

	fn reveals<'a>(&'a self, selected: &[&str]) -> Vec<&'a dyn FormField> {
		self.0
			.iter()
			.filter(|choice| selected.contains(&choice.value.as_str()))
			.filter_map(|choice| choice.reveal.as_deref())
			.collect()
	}
}

impl<C: Into<Choice>> FromIterator<C> for Choices {
	fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

/// The single selected value; repeated values never match a choice.
///
/// Matched exactly, without trimming, the same way wizard predicates
/// compare raw values.
fn single(raw: &RawValue) -> Option<&str> {
	match raw {
		RawValue::Text(value) => Some(value.as_str()),
		_ => None,
	}
}

fn single_check(choices: &Choices, raw: &RawValue) -> Option<String> {
	let known = single(raw).is_some_and(|value| choices.find(value).is_some());
	(!known).then(|| INVALID_CHOICE_MESSAGE.to_string())
}

fn single_clean(choices: &Choices, raw: &RawValue) -> Value {
	single(raw)
		.and_then(|value| choices.find(value))
		.map_or(Value::Null, |choice| Value::String(choice.label.clone()))
}

/// Radio group: exactly one choice
///
/// # Examples
///
/// ```
/// use formulary_forms::{FormField, Radios, RawValue};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut field = Radios::new("satisfaction", ["Very satisfied", "Dissatisfied"]);
///
/// field.set_value(RawValue::from("very_satisfied"));
/// assert_eq!(field.error(), "");
/// assert_eq!(field.clean().await.unwrap(), "Very satisfied");
///
/// field.set_value(RawValue::from("delighted"));
/// assert_eq!(field.error(), "Select a valid choice.");
/// # }
/// ```
#[derive(Debug)]
pub struct Radios {
	base: FieldBase,
	pub choices: Choices,
}

impl Radios {
	pub fn new<I, C>(name: impl Into<String>, choices: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: Into<Choice>,
	{
		Self {
			base: FieldBase::new(name),
			choices: choices.into_iter().collect(),
		}
	}
}

#[async_trait]
impl FormField for Radios {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		single_check(&self.choices, raw)
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(single_clean(&self.choices, &self.base.value))
	}

	fn revealed(&self) -> Vec<&dyn FormField> {
		match single(&self.base.value) {
			Some(selected) => self.choices.reveals(&[selected]),
			None => Vec::new(),
		}
	}
}

/// Checkbox group: any number of choices
///
/// Cleans to the labels of the selected choices, in declaration order.
///
/// # Examples
///
/// ```
/// use formulary_forms::{Checkboxes, FormField, RawValue};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut field = Checkboxes::new("contact", ["Email", "Text message", "Post"]);
/// field.set_value(RawValue::from(vec!["post", "email"]));
/// assert_eq!(field.error(), "");
/// assert_eq!(field.clean().await.unwrap(), json!(["Email", "Post"]));
/// # }
/// ```
#[derive(Debug)]
pub struct Checkboxes {
	base: FieldBase,
	pub choices: Choices,
}

impl Checkboxes {
	pub fn new<I, C>(name: impl Into<String>, choices: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: Into<Choice>,
	{
		Self {
			base: FieldBase::new(name),
			choices: choices.into_iter().collect(),
		}
	}

	fn selected(&self) -> Vec<&str> {
		self.base.value.values()
	}
}

#[async_trait]
impl FormField for Checkboxes {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		let values = raw.values();
		let known = !values.is_empty() && self.choices.all_known(values.into_iter());
		(!known).then(|| INVALID_CHOICE_MESSAGE.to_string())
	}

	async fn clean(&self) -> FieldResult<Value> {
		if self.base.value.is_blank() {
			return Ok(Value::Null);
		}
		let selected = self.selected();
		let labels = self
			.choices
			.iter()
			.filter(|choice| selected.contains(&choice.value.as_str()))
			.map(|choice| Value::String(choice.label.clone()))
			.collect();
		Ok(Value::Array(labels))
	}

	fn revealed(&self) -> Vec<&dyn FormField> {
		self.choices.reveals(&self.selected())
	}
}

/// Drop-down list: exactly one option
#[derive(Debug)]
pub struct Select {
	base: FieldBase,
	pub options: Choices,
}

impl Select {
	pub fn new<I, C>(name: impl Into<String>, options: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: Into<Choice>,
	{
		Self {
			base: FieldBase::new(name),
			options: options.into_iter().collect(),
		}
	}
}

#[async_trait]
impl FormField for Select {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	fn check(&self, raw: &RawValue) -> Option<String> {
		single_check(&self.options, raw)
	}

	async fn clean(&self) -> FieldResult<Value> {
		Ok(single_clean(&self.options, &self.base.value))
	}
}
