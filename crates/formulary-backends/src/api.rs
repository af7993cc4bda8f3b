//! Forwarding submissions to an HTTP endpoint

use crate::display_value;
use async_trait::async_trait;
use chrono::Utc;
use formulary_forms::{Backend, BackendError, BackendResult, CleanedData, FormRequest};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

/// One client per credential pair, shared by every backend that uses it
static CLIENTS: LazyLock<Mutex<HashMap<(String, String), Client>>> =
	LazyLock::new(|| Mutex::new(HashMap::new()));

fn client_for(username: &str, password: &str) -> BackendResult<Client> {
	let mut clients = CLIENTS.lock();
	let key = (username.to_string(), password.to_string());
	if let Some(client) = clients.get(&key) {
		return Ok(client.clone());
	}

	let client = Client::builder()
		.build()
		.map_err(|e| BackendError::Configuration(e.to_string()))?;
	clients.insert(key, client.clone());
	Ok(client)
}

/// Form body for a submission: one pair per value, lists repeated under
/// their key, then `form_name` and `submitted_on`
fn form_pairs(name: &str, data: &CleanedData) -> Vec<(String, String)> {
	let mut pairs = Vec::with_capacity(data.len() + 2);
	for (key, value) in data {
		match value {
			Value::Array(items) => {
				pairs.extend(items.iter().map(|item| (key.clone(), display_value(item))));
			}
			other => pairs.push((key.clone(), display_value(other))),
		}
	}
	pairs.push(("form_name".to_string(), name.to_string()));
	pairs.push(("submitted_on".to_string(), Utc::now().to_rfc3339()));
	pairs
}

/// POSTs each submission, form-encoded, to a fixed URL under basic auth.
///
/// # Examples
///
/// ```
/// use formulary_backends::ApiBackend;
///
/// let backend = ApiBackend::new("https://records.example.gov.uk/submissions", "svc", "secret");
/// assert!(backend.is_ok());
///
/// assert!(ApiBackend::new("not a url", "svc", "secret").is_err());
/// assert!(ApiBackend::new("ftp://example.com", "svc", "secret").is_err());
/// assert!(ApiBackend::new("https://example.com", "", "secret").is_err());
/// ```
pub struct ApiBackend {
	url: Url,
	username: String,
	password: String,
	client: Client,
}

impl std::fmt::Debug for ApiBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApiBackend")
			.field("url", &self.url.as_str())
			.field("username", &self.username)
			.finish_non_exhaustive()
	}
}

impl ApiBackend {
	pub fn new(
		url: &str,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> BackendResult<Self> {
		let url = Url::parse(url)
			.map_err(|e| BackendError::Configuration(format!("invalid URL '{}': {}", url, e)))?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(BackendError::Configuration(format!(
				"URL must be http or https: {}",
				url
			)));
		}

		let username = username.into();
		if username.trim().is_empty() {
			return Err(BackendError::Configuration(
				"API backend needs a username".to_string(),
			));
		}
		let password = password.into();
		let client = client_for(&username, &password)?;

		Ok(Self {
			url,
			username,
			password,
			client,
		})
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

#[async_trait]
impl Backend for ApiBackend {
	async fn process(
		&self,
		_request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		let response = self
			.client
			.post(self.url.clone())
			.basic_auth(&self.username, Some(&self.password))
			.form(&form_pairs(name, data))
			.send()
			.await
			.map_err(|e| {
				tracing::error!(form = name, url = %self.url, error = %e, "request failed");
				BackendError::Http(e.to_string())
			})?;

		let status = response.status();
		if !status.is_success() {
			tracing::error!(form = name, url = %self.url, %status, "endpoint rejected submission");
			return Err(BackendError::Http(format!("{} responded {}", self.url, status)));
		}

		tracing::info!(form = name, url = %self.url, "submission forwarded");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_form_pairs_flatten_lists() {
		let mut data = CleanedData::new();
		data.insert("name".to_string(), json!("Jo"));
		data.insert("contact".to_string(), json!(["Email", "Post"]));
		data.insert("phone".to_string(), json!(null));

		let pairs = form_pairs("profile", &data);
		let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();

		assert_eq!(
			keys,
			vec!["name", "contact", "contact", "phone", "form_name", "submitted_on"]
		);
		assert_eq!(pairs[1].1, "Email");
		assert_eq!(pairs[2].1, "Post");
		assert_eq!(pairs[3].1, "");
		assert_eq!(pairs[4].1, "profile");
		assert!(chrono::DateTime::parse_from_rfc3339(&pairs[5].1).is_ok());
	}

	#[test]
	fn test_client_reused_per_credentials() {
		let _ = ApiBackend::new("https://a.example.com", "reuse-user", "pw").unwrap();
		let _ = ApiBackend::new("https://b.example.com", "reuse-user", "pw").unwrap();
		let _ = ApiBackend::new("https://b.example.com", "reuse-user", "other").unwrap();

		let clients = CLIENTS.lock();
		let count = clients.keys().filter(|(user, _)| user == "reuse-user").count();
		assert_eq!(count, 2);
	}
}
