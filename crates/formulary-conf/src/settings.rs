//! Service settings

use crate::env::{Env, EnvError};
use std::path::PathBuf;

pub const DEFAULT_SERVICE_NAME: &str = "Formulary";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/service.db";
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Settings for a form service.
///
/// They are set for development on your own computer by default. When you
/// deploy a service, override them with environment variables:
///
/// | Variable | Default |
/// |---|---|
/// | `SERVICE_NAME` | `Formulary` |
/// | `DATABASE_URL` | `sqlite://data/service.db` |
/// | `DEV_MODE` | `true` |
/// | `NOTIFY_API_KEY` | unset |
/// | `MEDIA_ROOT` | `media` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub service_name: String,
	pub database_url: String,
	pub dev_mode: bool,
	pub notify_api_key: Option<String>,
	pub media_root: PathBuf,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			service_name: DEFAULT_SERVICE_NAME.to_string(),
			database_url: DEFAULT_DATABASE_URL.to_string(),
			dev_mode: true,
			notify_api_key: None,
			media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
		}
	}
}

impl Settings {
	/// Load settings from the process environment.
	///
	/// A `.env` file in the working directory (or a parent) is loaded first
	/// when present; variables already set in the environment win.
	pub fn from_env() -> Result<Self, SettingsError> {
		if let Err(e) = dotenv::dotenv()
			&& !e.not_found()
		{
			return Err(SettingsError::DotEnv(e.to_string()));
		}
		Self::from_source(&Env::new())
	}

	/// Load settings through a lookup function instead of the process environment
	///
	/// # Examples
	///
	/// ```
	/// use formulary_conf::Settings;
	///
	/// let settings = Settings::from_lookup(|key| match key {
	///     "SERVICE_NAME" => Some("Apply for a permit".to_string()),
	///     "DEV_MODE" => Some("false".to_string()),
	///     _ => None,
	/// })
	/// .unwrap();
	/// assert_eq!(settings.service_name, "Apply for a permit");
	/// assert!(!settings.dev_mode);
	/// assert!(settings.notify_api_key.is_none());
	/// ```
	pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Self::from_source(&Env::with_lookup(lookup))
	}

	fn from_source(env: &Env) -> Result<Self, SettingsError> {
		Ok(Self {
			service_name: env.str_with_default("SERVICE_NAME", Some(DEFAULT_SERVICE_NAME))?,
			database_url: env.str_with_default("DATABASE_URL", Some(DEFAULT_DATABASE_URL))?,
			dev_mode: env.bool_with_default("DEV_MODE", Some(true))?,
			notify_api_key: env.optional_str("NOTIFY_API_KEY")?,
			media_root: env
				.path_with_default("MEDIA_ROOT", Some(PathBuf::from(DEFAULT_MEDIA_ROOT)))?,
		})
	}
}

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error(transparent)]
	Env(#[from] EnvError),

	#[error("Failed to load .env file: {0}")]
	DotEnv(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_settings_defaults() {
		let settings = Settings::from_lookup(|_| None).unwrap();
		assert_eq!(settings, Settings::default());
		assert!(settings.dev_mode);
		assert_eq!(settings.media_root, PathBuf::from("media"));
	}

	#[test]
	fn test_settings_overrides() {
		let settings = Settings::from_lookup(|key| match key {
			"DATABASE_URL" => Some("sqlite::memory:".to_string()),
			"NOTIFY_API_KEY" => Some("key".to_string()),
			"MEDIA_ROOT" => Some("/srv/uploads".to_string()),
			_ => None,
		})
		.unwrap();

		assert_eq!(settings.database_url, "sqlite::memory:");
		assert_eq!(settings.notify_api_key.as_deref(), Some("key"));
		assert_eq!(settings.media_root, PathBuf::from("/srv/uploads"));
	}

	#[test]
	fn test_settings_invalid_dev_mode() {
		let result = Settings::from_lookup(|key| (key == "DEV_MODE").then(|| "sometimes".to_string()));
		assert!(matches!(
			result,
			Err(SettingsError::Env(EnvError::ParseError { .. }))
		));
	}
}
