//! GOV.UK Notify client
//!
//! Every request is authenticated with a short-lived HS256 JWT signed with the
//! secret half of the API key. The issuer is the service id.

use crate::{DeliveryReceipt, Notifier, NotifyError, NotifyResult, Personalisation};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.notifications.service.gov.uk";

const UUID_LEN: usize = 36;

/// A parsed Notify API key: `{key_name}-{service_id}-{secret}`.
///
/// # Examples
///
/// ```
/// use formulary_notify::ApiKey;
///
/// let key = ApiKey::parse(
///     "test_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0",
/// )
/// .unwrap();
/// assert_eq!(key.key_name(), "test_key");
/// assert_eq!(key.service_id(), "26785a09-ab16-4eb0-8407-a37497a57506");
///
/// assert!(ApiKey::parse("too-short").is_err());
/// ```
#[derive(Clone)]
pub struct ApiKey {
	key_name: String,
	service_id: String,
	secret: String,
}

impl std::fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApiKey")
			.field("key_name", &self.key_name)
			.field("service_id", &self.service_id)
			.finish_non_exhaustive()
	}
}

impl ApiKey {
	pub fn parse(raw: &str) -> NotifyResult<Self> {
		let raw = raw.trim();
		// name, '-', service id, '-', secret
		let min_len = 1 + 1 + UUID_LEN + 1 + UUID_LEN;
		if !raw.is_ascii() || raw.len() < min_len {
			return Err(NotifyError::InvalidApiKey(format!(
				"expected '{{key_name}}-{{service_id}}-{{secret}}', got {} characters",
				raw.len()
			)));
		}

		let secret_start = raw.len() - UUID_LEN;
		let service_start = secret_start - 1 - UUID_LEN;
		if &raw[secret_start - 1..secret_start] != "-" || &raw[service_start - 1..service_start] != "-" {
			return Err(NotifyError::InvalidApiKey(
				"service id and secret must be separated by '-'".to_string(),
			));
		}

		Ok(Self {
			key_name: raw[..service_start - 1].to_string(),
			service_id: raw[service_start..secret_start - 1].to_string(),
			secret: raw[secret_start..].to_string(),
		})
	}

	pub fn key_name(&self) -> &str {
		&self.key_name
	}

	pub fn service_id(&self) -> &str {
		&self.service_id
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
	pub iss: String,
	pub iat: i64,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
	template_id: &'a str,
	email_address: &'a str,
	personalisation: &'a Personalisation,
}

#[derive(Deserialize)]
struct ApiErrorBody {
	#[serde(default)]
	errors: Vec<ApiErrorEntry>,
}

#[derive(Deserialize)]
struct ApiErrorEntry {
	#[serde(default)]
	message: String,
}

/// GOV.UK Notify REST client
///
/// # Examples
///
/// ```no_run
/// use formulary_notify::{Notifier, NotifyClient, Personalisation};
///
/// #[tokio::main]
/// async fn main() {
///     let client = NotifyClient::new(
///         "live-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0",
///     )
///     .unwrap();
///
///     client
///         .send("template-id", "someone@example.gov.uk", &Personalisation::new())
///         .await
///         .unwrap();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NotifyClient {
	api_key: ApiKey,
	base_url: Url,
	client: Client,
}

impl NotifyClient {
	/// Create a client for the production Notify API
	pub fn new(api_key: &str) -> NotifyResult<Self> {
		Self::with_base_url(api_key, DEFAULT_BASE_URL)
	}

	/// Create a client for a different Notify endpoint
	pub fn with_base_url(api_key: &str, base_url: &str) -> NotifyResult<Self> {
		let api_key = ApiKey::parse(api_key)?;
		let base_url =
			Url::parse(base_url).map_err(|e| NotifyError::InvalidBaseUrl(e.to_string()))?;
		let client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.map_err(|e| NotifyError::Http(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			api_key,
			base_url,
			client,
		})
	}

	pub fn service_id(&self) -> &str {
		self.api_key.service_id()
	}

	fn token(&self) -> NotifyResult<String> {
		let claims = Claims {
			iss: self.api_key.service_id.clone(),
			iat: Utc::now().timestamp(),
		};
		encode(
			&Header::default(),
			&claims,
			&EncodingKey::from_secret(self.api_key.secret.as_bytes()),
		)
		.map_err(|e| NotifyError::Token(e.to_string()))
	}

	fn endpoint(&self, path: &str) -> NotifyResult<Url> {
		self.base_url
			.join(path)
			.map_err(|e| NotifyError::InvalidBaseUrl(e.to_string()))
	}
}

#[async_trait]
impl Notifier for NotifyClient {
	async fn send(
		&self,
		template_id: &str,
		email_address: &str,
		personalisation: &Personalisation,
	) -> NotifyResult<DeliveryReceipt> {
		let url = self.endpoint("/v2/notifications/email")?;
		let body = EmailRequest {
			template_id,
			email_address,
			personalisation,
		};

		let response = self
			.client
			.post(url)
			.bearer_auth(self.token()?)
			.json(&body)
			.send()
			.await
			.map_err(|e| NotifyError::Http(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let text = response
				.text()
				.await
				.unwrap_or_else(|_| "Unknown error".to_string());
			let message = match serde_json::from_str::<ApiErrorBody>(&text) {
				Ok(body) if !body.errors.is_empty() => body
					.errors
					.into_iter()
					.map(|e| e.message)
					.collect::<Vec<_>>()
					.join("; "),
				_ => text,
			};
			return Err(NotifyError::Api {
				status: status.as_u16(),
				message,
			});
		}

		let receipt: DeliveryReceipt = response
			.json()
			.await
			.map_err(|e| NotifyError::Http(format!("Invalid response body: {}", e)))?;
		tracing::info!(notification_id = %receipt.id, template_id, "email notification sent");
		Ok(receipt)
	}
}
