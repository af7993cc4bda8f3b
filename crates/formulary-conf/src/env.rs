//! Typed reads of configuration variables.
//!
//! Every read goes through a lookup closure, so settings can come from the
//! process environment or from a fixed table in tests.

use std::path::PathBuf;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Source of configuration variables
pub struct Env {
	lookup: Lookup,
}

impl std::fmt::Debug for Env {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Env").finish_non_exhaustive()
	}
}

impl Default for Env {
	fn default() -> Self {
		Self::new()
	}
}

impl Env {
	/// Reads from `std::env`
	pub fn new() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Reads through `lookup` instead of the process environment.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_conf::env::Env;
	///
	/// let env = Env::with_lookup(|name| (name == "PORT").then(|| "8000".to_string()));
	/// assert_eq!(env.str("PORT").unwrap(), "8000");
	/// assert!(env.str("HOST").is_err());
	/// ```
	pub fn with_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn fetch(&self, name: &str) -> Result<Option<String>, EnvError> {
		validate_env_var_name(name)?;
		Ok((self.lookup)(name))
	}

	fn or_default<T>(name: &str, value: Option<T>, default: Option<T>) -> Result<T, EnvError> {
		value
			.or(default)
			.ok_or_else(|| EnvError::MissingVariable(name.to_string()))
	}

	pub fn str(&self, name: &str) -> Result<String, EnvError> {
		self.str_with_default(name, None)
	}

	pub fn str_with_default(&self, name: &str, default: Option<&str>) -> Result<String, EnvError> {
		let value = self.fetch(name)?;
		Self::or_default(name, value, default.map(String::from))
	}

	/// `None` when unset or blank
	pub fn optional_str(&self, name: &str) -> Result<Option<String>, EnvError> {
		Ok(self.fetch(name)?.filter(|value| !value.trim().is_empty()))
	}

	/// Accepts the spellings listed on [`parse_bool`]
	pub fn bool_with_default(&self, name: &str, default: Option<bool>) -> Result<bool, EnvError> {
		let parsed = match self.fetch(name)? {
			Some(raw) => Some(parse_bool(&raw).map_err(|error| EnvError::ParseError {
				key: name.to_string(),
				value_len: raw.len(),
				error,
			})?),
			None => None,
		};
		Self::or_default(name, parsed, default)
	}

	pub fn path_with_default(
		&self,
		name: &str,
		default: Option<PathBuf>,
	) -> Result<PathBuf, EnvError> {
		let value = self.fetch(name)?.map(PathBuf::from);
		Self::or_default(name, value, default)
	}
}

/// `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0`, any case. Empty is false.
///
/// # Examples
///
/// ```
/// use formulary_conf::env::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Ok(true));
/// assert_eq!(parse_bool("off"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(value: &str) -> Result<bool, String> {
	let normalized = value.trim().to_ascii_lowercase();
	match normalized.as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" | "" => Ok(false),
		_ => Err(format!("expected a boolean, got {} characters", normalized.len())),
	}
}

/// A usable variable name is non-empty and free of `=` and control characters.
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	let problem = if name.is_empty() {
		Some("name is empty".to_string())
	} else if let Some(index) = name.find(char::is_control) {
		Some(format!("control character at byte {}", index))
	} else if name.contains('=') {
		Some("name contains '='".to_string())
	} else {
		None
	};

	match problem {
		Some(reason) => Err(EnvError::InvalidVariableName {
			name: name.escape_debug().to_string(),
			reason,
		}),
		None => Ok(()),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
	#[error("{0} is not set")]
	MissingVariable(String),

	/// Only the length of the offending value is kept, never the value
	#[error("{key} could not be parsed ({value_len} characters): {error}")]
	ParseError {
		key: String,
		value_len: usize,
		error: String,
	},

	#[error("cannot read variable \"{name}\": {reason}")]
	InvalidVariableName { name: String, reason: String },
}
