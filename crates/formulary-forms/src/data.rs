//! Submitted and cleaned form data

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cleaned values keyed by field name, in field declaration order
pub type CleanedData = IndexMap<String, serde_json::Value>;

/// A file submitted through a multipart form
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
	pub filename: String,
	pub content_type: String,
	#[serde(with = "serde_bytes")]
	pub content: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UploadedFile")
			.field("filename", &self.filename)
			.field("content_type", &self.content_type)
			.field("len", &self.content.len())
			.finish()
	}
}

impl UploadedFile {
	pub fn new(
		filename: impl Into<String>,
		content_type: impl Into<String>,
		content: impl Into<Vec<u8>>,
	) -> Self {
		Self {
			filename: filename.into(),
			content_type: content_type.into(),
			content: content.into(),
		}
	}
}

/// What a browser submitted for one name
///
/// # Examples
///
/// ```
/// use formulary_forms::RawValue;
///
/// assert!(RawValue::Empty.is_blank());
/// assert!(RawValue::from("  ").is_blank());
/// assert!(!RawValue::from("yes").is_blank());
/// assert_eq!(RawValue::from(vec!["10", "10", "2000"]).values(), vec!["10", "10", "2000"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
	/// Nothing submitted for this name
	#[default]
	Empty,
	Text(String),
	/// The name was repeated, e.g. the parts of a date or several checkboxes
	Multi(Vec<String>),
	File(UploadedFile),
}

impl RawValue {
	/// True when nothing usable was submitted.
	///
	/// Whitespace-only text and a file without a name count as blank.
	pub fn is_blank(&self) -> bool {
		match self {
			RawValue::Empty => true,
			RawValue::Text(s) => s.trim().is_empty(),
			RawValue::Multi(values) => values.iter().all(|v| v.trim().is_empty()),
			RawValue::File(file) => file.filename.trim().is_empty(),
		}
	}

	/// The single text value; the last one wins when the name was repeated
	pub fn text(&self) -> Option<&str> {
		match self {
			RawValue::Text(s) => Some(s),
			RawValue::Multi(values) => values.last().map(String::as_str),
			_ => None,
		}
	}

	/// All submitted text values
	pub fn values(&self) -> Vec<&str> {
		match self {
			RawValue::Text(s) => vec![s.as_str()],
			RawValue::Multi(values) => values.iter().map(String::as_str).collect(),
			_ => Vec::new(),
		}
	}

	pub fn file(&self) -> Option<&UploadedFile> {
		match self {
			RawValue::File(file) => Some(file),
			_ => None,
		}
	}

	/// Add a value submitted under the same name
	fn push(&mut self, value: String) {
		*self = match std::mem::take(self) {
			RawValue::Empty => RawValue::Text(value),
			RawValue::Text(first) => RawValue::Multi(vec![first, value]),
			RawValue::Multi(mut values) => {
				values.push(value);
				RawValue::Multi(values)
			}
			RawValue::File(_) => RawValue::Text(value),
		};
	}
}

impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		RawValue::Text(value.to_string())
	}
}

impl From<String> for RawValue {
	fn from(value: String) -> Self {
		RawValue::Text(value)
	}
}

impl From<Vec<&str>> for RawValue {
	fn from(values: Vec<&str>) -> Self {
		RawValue::Multi(values.into_iter().map(str::to_string).collect())
	}
}

impl From<Vec<String>> for RawValue {
	fn from(values: Vec<String>) -> Self {
		RawValue::Multi(values)
	}
}

impl From<UploadedFile> for RawValue {
	fn from(file: UploadedFile) -> Self {
		RawValue::File(file)
	}
}

/// Submitted form data, in submission order.
///
/// Repeated names collapse into [`RawValue::Multi`].
///
/// # Examples
///
/// ```
/// use formulary_forms::{FormData, RawValue};
///
/// let data = FormData::from_urlencoded("dob=10&dob=10&dob=2000&name=Jo+Bloggs").unwrap();
/// assert_eq!(data.get("dob"), Some(&RawValue::from(vec!["10", "10", "2000"])));
/// assert_eq!(data.get("name"), Some(&RawValue::from("Jo Bloggs")));
/// assert_eq!(data.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
	values: IndexMap<String, RawValue>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from `(name, value)` pairs
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut data = Self::new();
		for (name, value) in pairs {
			data.append(name, value);
		}
		data
	}

	/// Parse an `application/x-www-form-urlencoded` body
	pub fn from_urlencoded(body: &str) -> Result<Self, serde_urlencoded::de::Error> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
		Ok(Self::from_pairs(pairs))
	}

	/// Add one submitted value, collapsing repeats
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.values
			.entry(name.into())
			.or_default()
			.push(value.into());
	}

	/// Set the value for a name, replacing anything submitted before
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
		self.values.insert(name.into(), value.into());
	}

	/// Builder-style [`insert`](Self::insert)
	pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn get(&self, name: &str) -> Option<&RawValue> {
		self.values.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
		self.values.iter()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for FormData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut data = Self::new();
		for (name, value) in iter {
			data.insert(name, value);
		}
		data
	}
}
