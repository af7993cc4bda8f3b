//! NotifyClient against a mock Notify API

use formulary_notify::{Notifier, NotifyClient, NotifyError, Personalisation};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_ID: &str = "26785a09-ab16-4eb0-8407-a37497a57506";
const SECRET: &str = "3d844edf-8d35-48ac-975b-e847b4f122b0";

#[derive(Debug, Deserialize)]
struct Claims {
	iss: String,
	iat: i64,
}

fn api_key() -> String {
	format!("test_key-{}-{}", SERVICE_ID, SECRET)
}

fn personalisation() -> Personalisation {
	let mut personalisation = Personalisation::new();
	personalisation.insert("form_name".to_string(), "feedback".to_string());
	personalisation.insert("form_data".to_string(), "* satisfaction: Satisfied".to_string());
	personalisation.insert("service_name".to_string(), "Formulary".to_string());
	personalisation
}

#[tokio::test]
async fn test_send_email_posts_signed_request() {
	let mock_server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/v2/notifications/email"))
		.and(header_exists("authorization"))
		.and(body_json(json!({
			"template_id": "template-123",
			"email_address": "team@example.gov.uk",
			"personalisation": {
				"form_data": "* satisfaction: Satisfied",
				"form_name": "feedback",
				"service_name": "Formulary"
			}
		})))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({
			"id": "740e5834-3a29-46b4-9a6f-16142fde533a",
			"reference": null,
			"uri": "https://api.notifications.service.gov.uk/v2/notifications/740e5834",
			"content": {"subject": "New submission"}
		})))
		.expect(1)
		.mount(&mock_server)
		.await;

	let client = NotifyClient::with_base_url(&api_key(), &mock_server.uri()).unwrap();
	let receipt = client
		.send("template-123", "team@example.gov.uk", &personalisation())
		.await
		.unwrap();

	assert_eq!(receipt.id, "740e5834-3a29-46b4-9a6f-16142fde533a");
	assert_eq!(receipt.reference, None);

	let requests = mock_server.received_requests().await.unwrap();
	let auth = requests[0]
		.headers
		.get("authorization")
		.unwrap()
		.to_str()
		.unwrap()
		.to_string();
	let token = auth.strip_prefix("Bearer ").unwrap();

	let mut validation = Validation::new(Algorithm::HS256);
	validation.required_spec_claims.clear();
	validation.validate_exp = false;
	let claims = decode::<Claims>(
		token,
		&DecodingKey::from_secret(SECRET.as_bytes()),
		&validation,
	)
	.unwrap()
	.claims;

	assert_eq!(claims.iss, SERVICE_ID);
	assert!((now_secs() - claims.iat).abs() < 60);
}

#[tokio::test]
async fn test_api_error_is_returned() {
	let mock_server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/v2/notifications/email"))
		.respond_with(ResponseTemplate::new(400).set_body_json(json!({
			"errors": [{"error": "BadRequestError", "message": "Can't send to this recipient using a team-only API key"}],
			"status_code": 400
		})))
		.mount(&mock_server)
		.await;

	let client = NotifyClient::with_base_url(&api_key(), &mock_server.uri()).unwrap();
	let err = client
		.send("template-123", "someone@example.com", &personalisation())
		.await
		.unwrap_err();

	match err {
		NotifyError::Api { status, message } => {
			assert_eq!(status, 400);
			assert!(message.contains("team-only API key"));
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
	let client = NotifyClient::with_base_url(&api_key(), "http://127.0.0.1:1").unwrap();
	let result = client
		.send("template-123", "team@example.gov.uk", &personalisation())
		.await;

	assert!(matches!(result, Err(NotifyError::Http(_))));
}

fn now_secs() -> i64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.unwrap()
		.as_secs() as i64
}
