//! Forms with file uploads backed by a local content store.

use formulary_forms::{
	FieldError, FileUpload, Form, FormData, FormError, FormField, FormRequest, Question, RawValue,
	StepOutcome, TextInput, UploadedFile, Wizard,
};
use formulary_storages::{LocalStorage, MemoryStorage, StorageBackend};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

struct UploadForm {
	temp_dir: TempDir,
	form: Form,
}

#[fixture]
fn upload_form() -> UploadForm {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	std::fs::create_dir(temp_dir.path().join("evidence")).expect("Failed to create upload dir");
	let storage = Arc::new(LocalStorage::new(temp_dir.path()).expect("Failed to create storage"));
	let form = Form::builder("claim")
		.field(TextInput::new("reference").with_label("Claim reference"))
		.field(
			FileUpload::new("evidence", storage)
				.upload_to("evidence")
				.with_label("Upload evidence"),
		)
		.success_url("/claim/submitted")
		.build()
		.expect("form should build");
	UploadForm { temp_dir, form }
}

fn scan(filename: &str) -> RawValue {
	RawValue::File(UploadedFile::new(filename, "image/png", b"\x89PNG".to_vec()))
}

#[rstest]
#[tokio::test]
async fn test_upload_is_stored_and_recorded(mut upload_form: UploadForm) {
	upload_form
		.form
		.bind(FormData::new().with("reference", "AB123").with("evidence", scan("../../scan.png")));
	assert!(upload_form.form.valid());
	let mut request = FormRequest::default();

	upload_form
		.form
		.process(&mut request)
		.await
		.expect("process should succeed");

	assert_eq!(
		request.session.get("claim"),
		Some(&json!({"reference": "AB123", "evidence": "evidence/scan.png"}))
	);
	let stored = std::fs::read(upload_form.temp_dir.path().join("evidence/scan.png"))
		.expect("file written");
	assert_eq!(stored, b"\x89PNG");
}

#[rstest]
#[tokio::test]
async fn test_missing_upload_is_required(mut upload_form: UploadForm) {
	upload_form
		.form
		.bind(FormData::new().with("reference", "AB123").with("evidence", scan("")));

	assert!(!upload_form.form.valid());
	assert_eq!(upload_form.form.errors()["evidence"], "This field is required.");
}

#[rstest]
#[tokio::test]
async fn test_store_failure_aborts_processing(mut upload_form: UploadForm) {
	upload_form
		.form
		.bind(FormData::new().with("reference", "AB123").with("evidence", scan("scan.png")));
	// A plain file where the upload directory should be
	let upload_dir = upload_form.temp_dir.path().join("evidence");
	std::fs::remove_dir(&upload_dir).expect("Failed to remove upload dir");
	std::fs::write(&upload_dir, b"").expect("Failed to create blocking file");
	let mut request = FormRequest::default();

	let result = upload_form.form.process(&mut request).await;

	assert!(matches!(
		result,
		Err(FormError::Field(FieldError::Storage { ref field, .. })) if field == "evidence"
	));
	assert!(request.session.get("claim").is_none());
}

#[tokio::test]
async fn test_storage_is_shared_between_fields() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let storage: Arc<dyn StorageBackend> =
		Arc::new(LocalStorage::new(temp_dir.path()).expect("Failed to create storage"));
	let mut form = Form::builder("documents")
		.field(FileUpload::new("front", storage.clone()))
		.field(FileUpload::new("back", storage.clone()).optional())
		.build()
		.expect("form should build");
	form.bind(FormData::new().with("front", scan("front.png")));

	let cleaned = form.clean().await.expect("clean should succeed");

	assert_eq!(cleaned["front"], json!("front.png"));
	assert_eq!(cleaned["back"], json!(null));
	assert!(storage.exists("front.png").await.expect("exists"));
}

#[tokio::test]
async fn test_wizard_keeps_stored_name_not_file_content() {
	let storage = Arc::new(MemoryStorage::new());
	let wizard = || {
		Wizard::builder("claim")
			.question(
				Question::new("evidence")
					.field(FileUpload::new("evidence", storage.clone()).upload_to("evidence")),
			)
			.question(Question::new("reference").field(TextInput::new("reference")))
			.build()
			.expect("wizard should build")
	};
	let mut request = FormRequest::new(
		FormData::new().with("evidence", scan("scan.png")),
		Default::default(),
	);

	let outcome = wizard().post(0, &mut request).await.expect("step 0");

	assert!(matches!(outcome, StepOutcome::Next(_)));
	let accumulator = wizard().accumulator(&request.session).expect("accumulator");
	assert_eq!(
		accumulator.values.get("evidence"),
		Some(&RawValue::from("evidence/scan.png"))
	);
	let stored_session = serde_json::to_string(&request.session).expect("session json");
	assert!(!stored_session.contains("image/png"));
	assert!(storage.exists("evidence/scan.png").await.expect("exists"));

	request.data = FormData::new().with("reference", "AB123");
	let outcome = wizard().post(1, &mut request).await.expect("step 1");

	assert!(matches!(outcome, StepOutcome::Finished(_)));
	assert_eq!(
		request.session.get("claim"),
		Some(&json!({"evidence": "evidence/scan.png", "reference": "AB123"}))
	);
}
