//! Email notification of submissions

use crate::display_value;
use async_trait::async_trait;
use formulary_forms::{Backend, BackendError, BackendResult, CleanedData, FormRequest};
use formulary_notify::{Notifier, Personalisation};
use std::sync::Arc;

/// Sends each submission to a fixed recipient through a Notify template.
///
/// The template receives three personalisation fields: `form_name`,
/// `form_data` (one `* key: value` line per field) and `service_name`.
pub struct EmailBackend {
	notifier: Arc<dyn Notifier>,
	template_id: String,
	email_address: String,
	service_name: String,
}

impl std::fmt::Debug for EmailBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EmailBackend")
			.field("template_id", &self.template_id)
			.field("email_address", &self.email_address)
			.field("service_name", &self.service_name)
			.finish_non_exhaustive()
	}
}

impl EmailBackend {
	/// # Errors
	///
	/// `BackendError::Configuration` when the template id or the recipient is empty.
	pub fn new(
		notifier: Arc<dyn Notifier>,
		template_id: impl Into<String>,
		email_address: impl Into<String>,
		service_name: impl Into<String>,
	) -> BackendResult<Self> {
		let template_id = template_id.into();
		let email_address = email_address.into();
		if template_id.trim().is_empty() {
			return Err(BackendError::Configuration(
				"email backend needs a template id".to_string(),
			));
		}
		if email_address.trim().is_empty() {
			return Err(BackendError::Configuration(
				"email backend needs a recipient".to_string(),
			));
		}

		Ok(Self {
			notifier,
			template_id,
			email_address,
			service_name: service_name.into(),
		})
	}

	pub fn template_id(&self) -> &str {
		&self.template_id
	}

	pub fn email_address(&self) -> &str {
		&self.email_address
	}

	/// The `form_data` body
	///
	/// # Examples
	///
	/// ```
	/// use formulary_backends::EmailBackend;
	/// use formulary_forms::CleanedData;
	/// use serde_json::json;
	///
	/// let mut data = CleanedData::new();
	/// data.insert("name".to_string(), json!("Jo"));
	/// data.insert("contact".to_string(), json!(["Email", "Post"]));
	/// data.insert("phone".to_string(), json!(null));
	///
	/// assert_eq!(
	///     EmailBackend::format_data(&data),
	///     "* name: Jo\n* contact: Email, Post\n* phone: "
	/// );
	/// ```
	pub fn format_data(data: &CleanedData) -> String {
		data.iter()
			.map(|(key, value)| format!("* {}: {}", key, display_value(value)))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

#[async_trait]
impl Backend for EmailBackend {
	async fn process(
		&self,
		_request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		let mut personalisation = Personalisation::new();
		personalisation.insert("form_name".to_string(), name.to_string());
		personalisation.insert("form_data".to_string(), Self::format_data(data));
		personalisation.insert("service_name".to_string(), self.service_name.clone());

		match self
			.notifier
			.send(&self.template_id, &self.email_address, &personalisation)
			.await
		{
			Ok(receipt) => {
				tracing::info!(form = name, notification = %receipt.id, "submission emailed");
				Ok(())
			}
			Err(e) => {
				tracing::error!(form = name, error = %e, "failed to email submission");
				Err(BackendError::Delivery(e))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formulary_notify::{MemoryNotifier, NotifyError};
	use rstest::rstest;
	use serde_json::json;

	const TEMPLATE: &str = "4f2a9c1e-7d3b-4e8a-9b6c-0a1d2e3f4a5b";

	fn data() -> CleanedData {
		let mut data = CleanedData::new();
		data.insert("name".to_string(), json!("Jo Bloggs"));
		data.insert("age".to_string(), json!(30));
		data
	}

	#[rstest]
	#[case("", "team@example.gov.uk")]
	#[case("  ", "team@example.gov.uk")]
	#[case(TEMPLATE, "")]
	fn test_new_rejects_missing_configuration(#[case] template_id: &str, #[case] email: &str) {
		let result = EmailBackend::new(
			Arc::new(MemoryNotifier::new()),
			template_id,
			email,
			"Service",
		);
		assert!(matches!(result, Err(BackendError::Configuration(_))));
	}

	#[tokio::test]
	async fn test_process_sends_personalisation() {
		let notifier = MemoryNotifier::new();
		let backend = EmailBackend::new(
			Arc::new(notifier.clone()),
			TEMPLATE,
			"team@example.gov.uk",
			"Apply for a licence",
		)
		.unwrap();
		let mut request = FormRequest::default();

		backend.process(&mut request, "profile", &data()).await.unwrap();

		let sent = notifier.sent();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].template_id, TEMPLATE);
		assert_eq!(sent[0].email_address, "team@example.gov.uk");
		assert_eq!(sent[0].personalisation["form_name"], "profile");
		assert_eq!(sent[0].personalisation["form_data"], "* name: Jo Bloggs\n* age: 30");
		assert_eq!(sent[0].personalisation["service_name"], "Apply for a licence");
	}

	#[tokio::test]
	async fn test_delivery_failure_is_returned() {
		let notifier = MemoryNotifier::new();
		notifier.fail_with("mailbox unavailable");
		let backend =
			EmailBackend::new(Arc::new(notifier), TEMPLATE, "team@example.gov.uk", "Service")
				.unwrap();
		let mut request = FormRequest::default();

		let result = backend.process(&mut request, "profile", &data()).await;

		assert!(matches!(
			result,
			Err(BackendError::Delivery(NotifyError::Delivery(ref message))) if message == "mailbox unavailable"
		));
	}
}
