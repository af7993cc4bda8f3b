//! Requests through the service: sessions, wizards and backends together

#![cfg(feature = "backends")]

use formulary::forms::ItemView;
use formulary::prelude::*;
use formulary::sessions::SessionStore as _;
use http::{Method, StatusCode};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

const TEMPLATE: &str = "4f2a9c1e-7d3b-4e8a-9b6c-0a1d2e3f4a5b";

struct TestService {
	service: Service,
	sessions: Arc<InMemorySessionStore>,
	notifier: MemoryNotifier,
}

#[fixture]
async fn test_service() -> TestService {
	let sessions = Arc::new(InMemorySessionStore::new());
	let notifier = MemoryNotifier::new();
	let database = Arc::new(
		DatabaseBackend::connect("sqlite::memory:")
			.await
			.expect("in-memory database"),
	);

	let mut service = Service::new(Settings::default())
		.with_sessions(sessions.clone())
		.with_notifier(Arc::new(notifier.clone()))
		.with_database(database);

	service.register_form("feedback", |service| {
		let email = service
			.email_backend(TEMPLATE, "team@example.gov.uk")
			.map_err(|e| FormError::Configuration(e.to_string()))?;
		let database = service
			.database_backend()
			.map_err(|e| FormError::Configuration(e.to_string()))?;
		Form::builder("feedback")
			.field(Radios::new("satisfaction", ["Satisfied", "Dissatisfied"]))
			.backend(database)
			.backend(Arc::new(email))
			.success_with(|data| {
				format!(
					"/feedback/thanks?rating={}",
					data.get("satisfaction").and_then(RawValue::text).unwrap_or("")
				)
			})
			.build()
	});

	service.register_wizard("equality", |_| {
		Wizard::builder("equality")
			.base_url("/questions/equality")
			.question(Question::new("permission").field(Radios::new("permission", ["yes", "no"])))
			.question(
				Question::new("health")
					.field(Radios::new("health", ["yes", "no"]))
					.when("permission", "yes"),
			)
			.question(
				Question::new("ability")
					.field(Radios::new("ability", ["yes", "no"]))
					.when("permission", "yes")
					.when("health", "yes"),
			)
			.question(
				Question::new("sex-block")
					.field(Radios::new("sex", ["female", "male"]))
					.when("permission", "yes"),
			)
			.backend(Arc::new(AddSessionBackend))
			.success_url("/questions/equality/done")
			.build()
	});

	TestService {
		service,
		sessions,
		notifier,
	}
}

#[rstest]
#[tokio::test]
async fn test_form_post_runs_backends_and_redirects(#[future] test_service: TestService) {
	let t = test_service.await;

	let response = t
		.service
		.form(
			Method::POST,
			"feedback",
			None,
			FormData::new().with("satisfaction", "dissatisfied"),
		)
		.await
		.expect("request succeeds");

	assert_eq!(response.status, StatusCode::SEE_OTHER);
	assert_eq!(
		response.location.as_deref(),
		Some("/feedback/thanks?rating=dissatisfied")
	);
	let sent = t.notifier.sent();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].personalisation["form_data"], "* satisfaction: Dissatisfied");
	assert_eq!(sent[0].personalisation["service_name"], "Formulary");
	let rows = t
		.service
		.database_backend()
		.expect("database")
		.submissions("feedback")
		.await
		.expect("query");
	assert_eq!(rows.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_backend_failure_is_server_error(#[future] test_service: TestService) {
	let t = test_service.await;
	t.notifier.fail_with("Notify is down");

	let result = t
		.service
		.form(
			Method::POST,
			"feedback",
			None,
			FormData::new().with("satisfaction", "satisfied"),
		)
		.await;

	let error = result.expect_err("delivery failure must not redirect");
	assert!(matches!(
		error,
		ServiceError::Form(FormError::Backend(BackendError::Delivery(_)))
	));
	assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[tokio::test]
async fn test_wizard_session_persists_between_requests(#[future] test_service: TestService) {
	let t = test_service.await;

	let first = t
		.service
		.wizard(
			Method::POST,
			"equality",
			None,
			None,
			FormData::new().with("permission", "yes"),
		)
		.await
		.expect("step 0");
	assert_eq!(first.location.as_deref(), Some("/questions/equality/1"));
	let session_id = first.session_id.clone();

	let second = t
		.service
		.wizard(
			Method::POST,
			"equality",
			Some(1),
			Some(&session_id),
			FormData::new().with("health", "no"),
		)
		.await
		.expect("step 1");
	assert_eq!(second.location.as_deref(), Some("/questions/equality/3"));

	let page = t
		.service
		.wizard(Method::GET, "equality", Some(1), Some(&session_id), FormData::new())
		.await
		.expect("step 1 page")
		.page
		.expect("page");
	let ItemView::Field(field) = &page.items[0] else {
		panic!("expected a field");
	};
	assert_eq!(field.value.text(), Some("no"));

	let last = t
		.service
		.wizard(
			Method::POST,
			"equality",
			Some(3),
			Some(&session_id),
			FormData::new().with("sex", "female"),
		)
		.await
		.expect("step 3");
	assert_eq!(last.location.as_deref(), Some("/questions/equality/done"));

	let session = t.sessions.load(&session_id).await.expect("session saved");
	assert_eq!(
		session.get("equality"),
		Some(&json!({"permission": "yes", "health": "no", "sex": "female"}))
	);
	assert!(!session.contains_key("wizard:equality"));
}

#[rstest]
#[case(Some(4))]
#[case(Some(100))]
#[tokio::test]
async fn test_wizard_unknown_step_is_not_found(
	#[future] test_service: TestService,
	#[case] step: Option<usize>,
) {
	let t = test_service.await;

	let error = t
		.service
		.wizard(Method::GET, "equality", step, None, FormData::new())
		.await
		.expect_err("no such step");

	assert_eq!(error.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_unknown_wizard_is_not_found(#[future] test_service: TestService) {
	let t = test_service.await;

	let error = t
		.service
		.wizard(Method::POST, "missing", Some(0), None, FormData::new())
		.await
		.expect_err("no such wizard");

	assert!(matches!(error, ServiceError::NotFound(_)));
}

#[test]
fn test_from_settings_rejects_malformed_api_key() {
	let settings = Settings::from_lookup(|key| match key {
		"NOTIFY_API_KEY" => Some("too-short".to_string()),
		_ => None,
	})
	.expect("settings load");

	let result = Service::from_settings(settings);

	assert!(matches!(result, Err(ServiceError::Configuration(_))));
}
