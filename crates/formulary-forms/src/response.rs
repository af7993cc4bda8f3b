//! Redirect instructions returned by forms and wizards

use http::StatusCode;

/// Where to send the browser next
///
/// # Examples
///
/// ```
/// use formulary_forms::Redirect;
/// use http::StatusCode;
///
/// let redirect = Redirect::see_other("/questions/equality/1");
/// assert_eq!(redirect.status, StatusCode::SEE_OTHER);
/// assert_eq!(redirect.location, "/questions/equality/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	pub status: StatusCode,
	pub location: String,
}

impl Redirect {
	/// 303: follow with a GET, used after a successful POST
	pub fn see_other(location: impl Into<String>) -> Self {
		Self {
			status: StatusCode::SEE_OTHER,
			location: location.into(),
		}
	}

	/// 307
	pub fn temporary(location: impl Into<String>) -> Self {
		Self {
			status: StatusCode::TEMPORARY_REDIRECT,
			location: location.into(),
		}
	}
}
