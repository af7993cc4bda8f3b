//! Field groups and the item tree shared by forms and wizard questions

use crate::data::{CleanedData, FormData, RawValue};
use crate::field::{FieldResult, FormField};
use crate::view::{ErrorLink, ErrorSummary, FieldView, ItemView};
use indexmap::IndexMap;

/// A labelled group of fields.
///
/// Fieldsets are never validated themselves; forms look straight through
/// them to the fields inside.
///
/// # Examples
///
/// ```
/// use formulary_forms::{Fieldset, TextInput};
///
/// let address = Fieldset::new("Your address")
///     .field(TextInput::new("line_1"))
///     .field(TextInput::new("town"));
/// assert_eq!(address.fields().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Fieldset {
	pub legend: String,
	fields: Vec<Box<dyn FormField>>,
}

impl Fieldset {
	pub fn new(legend: impl Into<String>) -> Self {
		Self {
			legend: legend.into(),
			fields: Vec::new(),
		}
	}

	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.fields.push(Box::new(field));
		self
	}

	pub fn fields(&self) -> impl Iterator<Item = &dyn FormField> {
		self.fields.iter().map(as_field)
	}
}

fn as_field(field: &Box<dyn FormField>) -> &dyn FormField {
	field.as_ref()
}

/// A top-level entry of a form or question
#[derive(Debug)]
pub enum FormItem {
	Field(Box<dyn FormField>),
	Fieldset(Fieldset),
}

impl FormItem {
	fn fields(&self) -> Box<dyn Iterator<Item = &dyn FormField> + Send + '_> {
		match self {
			FormItem::Field(field) => Box::new(std::iter::once(as_field(field))),
			FormItem::Fieldset(fieldset) => Box::new(fieldset.fields()),
		}
	}

	fn fields_mut(&mut self) -> Box<dyn Iterator<Item = &mut Box<dyn FormField>> + Send + '_> {
		match self {
			FormItem::Field(field) => Box::new(std::iter::once(field)),
			FormItem::Fieldset(fieldset) => Box::new(fieldset.fields.iter_mut()),
		}
	}
}

/// Ordered items with the traversal shared by [`Form`](crate::Form) and
/// [`Question`](crate::Question)
#[derive(Debug, Default)]
pub struct Items(Vec<FormItem>);

impl Items {
	pub fn push_field(&mut self, field: Box<dyn FormField>) {
		self.0.push(FormItem::Field(field));
	}

	pub fn push_fieldset(&mut self, fieldset: Fieldset) {
		self.0.push(FormItem::Fieldset(fieldset));
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn items(&self) -> &[FormItem] {
		&self.0
	}

	/// Every field, with fieldsets flattened, in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &dyn FormField> {
		self.0.iter().flat_map(FormItem::fields)
	}

	pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn FormField>> {
		self.0.iter_mut().flat_map(FormItem::fields_mut)
	}

	pub fn field(&self, name: &str) -> Option<&dyn FormField> {
		self.fields().find(|field| field.name() == name)
	}

	pub fn names(&self) -> Vec<String> {
		self.fields().map(|field| field.name().to_string()).collect()
	}

	/// Assign every field its submitted value; an absent name is blank
	pub fn bind(&mut self, data: &FormData) {
		for field in self.fields_mut() {
			let raw = data.get(field.name()).cloned().unwrap_or_default();
			field.set_value(raw);
		}
	}

	/// Assign values without validating; fields with no stored value are left alone
	pub fn prefill(&mut self, values: &IndexMap<String, RawValue>) {
		for field in self.fields_mut() {
			if let Some(raw) = values.get(field.name()) {
				field.prefill(raw.clone());
			}
		}
	}

	pub fn valid(&self) -> bool {
		self.fields().all(|field| field.error().is_empty())
	}

	pub fn errors(&self) -> IndexMap<String, String> {
		self.fields()
			.filter(|field| !field.error().is_empty())
			.map(|field| (field.name().to_string(), field.error().to_string()))
			.collect()
	}

	/// Raw values of every field, for carrying between requests
	pub fn values(&self) -> IndexMap<String, RawValue> {
		self.fields()
			.map(|field| (field.name().to_string(), field.value().clone()))
			.collect()
	}

	/// Clean every field, one at a time, in declaration order
	pub async fn clean(&self) -> FieldResult<CleanedData> {
		let mut cleaned = CleanedData::new();
		for field in self.fields() {
			let value = field.clean().await?;
			cleaned.insert(field.name().to_string(), value);
		}
		Ok(cleaned)
	}

	pub fn error_summary(&self) -> Option<ErrorSummary> {
		let links: Vec<ErrorLink> = self
			.fields()
			.filter(|field| !field.error().is_empty())
			.map(|field| ErrorLink {
				text: if field.label().is_empty() {
					field.name().to_string()
				} else {
					field.label().to_string()
				},
				href: format!("#{}", field.id()),
			})
			.collect();

		(!links.is_empty()).then(|| ErrorSummary::new(links))
	}

	pub fn view(&self) -> Vec<ItemView> {
		self.0
			.iter()
			.map(|item| match item {
				FormItem::Field(field) => ItemView::Field(FieldView::of(field.as_ref())),
				FormItem::Fieldset(fieldset) => ItemView::Fieldset {
					legend: fieldset.legend.clone(),
					fields: fieldset.fields().map(FieldView::of).collect(),
				},
			})
			.collect()
	}
}
