//! In-memory notifier

use crate::{DeliveryReceipt, Notifier, NotifyError, NotifyResult, Personalisation};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// A notification recorded by [`MemoryNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
	pub template_id: String,
	pub email_address: String,
	pub personalisation: Personalisation,
}

#[derive(Debug, Default)]
struct State {
	sent: Vec<SentNotification>,
	failure: Option<String>,
}

/// Notifier that keeps every send in memory.
///
/// Clones share the same record. Call [`fail_with`](Self::fail_with) to make
/// subsequent sends fail.
///
/// # Examples
///
/// ```
/// use formulary_notify::{MemoryNotifier, Notifier, NotifyError, Personalisation};
///
/// # #[tokio::main]
/// # async fn main() {
/// let notifier = MemoryNotifier::new();
/// notifier.fail_with("mailbox unavailable");
///
/// let result = notifier.send("t", "a@example.com", &Personalisation::new()).await;
/// assert!(matches!(result, Err(NotifyError::Delivery(_))));
/// assert!(notifier.sent().is_empty());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
	state: Arc<Mutex<State>>,
}

impl MemoryNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make every following send fail with `message`
	pub fn fail_with(&self, message: impl Into<String>) {
		self.state.lock().failure = Some(message.into());
	}

	/// Accept sends again
	pub fn recover(&self) {
		self.state.lock().failure = None;
	}

	/// Everything sent so far, oldest first
	pub fn sent(&self) -> Vec<SentNotification> {
		self.state.lock().sent.clone()
	}
}

#[async_trait]
impl Notifier for MemoryNotifier {
	async fn send(
		&self,
		template_id: &str,
		email_address: &str,
		personalisation: &Personalisation,
	) -> NotifyResult<DeliveryReceipt> {
		let mut state = self.state.lock();
		if let Some(message) = &state.failure {
			return Err(NotifyError::Delivery(message.clone()));
		}

		state.sent.push(SentNotification {
			template_id: template_id.to_string(),
			email_address: email_address.to_string(),
			personalisation: personalisation.clone(),
		});

		Ok(DeliveryReceipt {
			id: uuid::Uuid::new_v4().to_string(),
			reference: None,
			uri: None,
		})
	}
}
