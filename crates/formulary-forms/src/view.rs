//! What a renderer needs to draw a form or a wizard step

use crate::data::RawValue;
use crate::field::FormField;
use indexmap::IndexMap;
use serde::Serialize;

pub const ERROR_SUMMARY_TITLE: &str = "There is a problem";

/// Link from the error summary to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLink {
	pub text: String,
	pub href: String,
}

/// Summary shown above a form that has errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
	pub title: String,
	pub links: Vec<ErrorLink>,
}

impl ErrorSummary {
	pub fn new(links: Vec<ErrorLink>) -> Self {
		Self {
			title: ERROR_SUMMARY_TITLE.to_string(),
			links,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
	pub name: String,
	pub id: String,
	pub label: String,
	pub hint: String,
	pub required: bool,
	pub value: RawValue,
	pub error: String,
	pub revealed: Vec<FieldView>,
}

impl FieldView {
	pub fn of(field: &dyn FormField) -> Self {
		Self {
			name: field.name().to_string(),
			id: field.id(),
			label: field.label().to_string(),
			hint: field.hint().to_string(),
			required: field.required(),
			value: field.value().clone(),
			error: field.error().to_string(),
			revealed: field.revealed().into_iter().map(FieldView::of).collect(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemView {
	Field(FieldView),
	Fieldset { legend: String, fields: Vec<FieldView> },
}

/// A page holding one form or one wizard step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
	pub title: String,
	pub form_name: String,
	pub method: String,
	pub action: String,
	pub cta: String,
	pub error_summary: Option<ErrorSummary>,
	pub errors: IndexMap<String, String>,
	pub items: Vec<ItemView>,
}
