//! # Formulary Conf
//!
//! Settings for form services, read from the environment with development
//! defaults.
//!
//! ```
//! use formulary_conf::Settings;
//!
//! let settings = Settings::from_lookup(|_| None).unwrap();
//! assert_eq!(settings.service_name, "Formulary");
//! ```

pub mod env;
pub mod settings;

pub use env::{Env, EnvError};
pub use settings::{Settings, SettingsError};
