//! The notification collaborator contract

use crate::NotifyResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template placeholders and their values
pub type Personalisation = BTreeMap<String, String>;

/// What the notification service reports back for an accepted email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
	pub id: String,
	#[serde(default)]
	pub reference: Option<String>,
	#[serde(default)]
	pub uri: Option<String>,
}

/// Sends templated emails.
///
/// Implementations must return an error when the email was not accepted;
/// callers treat `Ok` as delivered.
#[async_trait]
pub trait Notifier: Send + Sync {
	async fn send(
		&self,
		template_id: &str,
		email_address: &str,
		personalisation: &Personalisation,
	) -> NotifyResult<DeliveryReceipt>;
}
