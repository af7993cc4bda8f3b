use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;

/// The JSON values kept for one browser between requests.
///
/// Keys are free-form. Wizards use `wizard:{name}`; the session backends use
/// the form name.
///
/// # Examples
///
/// ```
/// use formulary_sessions::Session;
///
/// let session = Session::new();
/// assert!(session.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
	values: HashMap<String, Value>,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `key`. Whatever was there before is dropped.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_sessions::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("feedback", json!({"satisfaction": "Satisfied"}));
	/// assert_eq!(session.get("feedback"), Some(&json!({"satisfaction": "Satisfied"})));
	/// ```
	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		self.values.insert(key.into(), value);
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// In-place access, used by backends that merge into an existing entry
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.values.get_mut(key)
	}

	/// Reads the entry under `key` back into a typed value.
	///
	/// A missing key is `Ok(None)`; an entry of the wrong shape is an error.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_sessions::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("count", json!(3));
	/// assert_eq!(session.get_as::<u32>("count").unwrap(), Some(3));
	/// assert_eq!(session.get_as::<u32>("missing").unwrap(), None);
	/// assert!(session.get_as::<String>("count").is_err());
	/// ```
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
		match self.values.get(key) {
			Some(value) => T::deserialize(value).map(Some),
			None => Ok(None),
		}
	}

	pub fn set_as<T: Serialize>(
		&mut self,
		key: impl Into<String>,
		value: &T,
	) -> Result<(), serde_json::Error> {
		self.set(key, serde_json::to_value(value)?);
		Ok(())
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.values.remove(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn clear(&mut self) {
		self.values.clear();
	}
}
