//! # Formulary Notify
//!
//! Outbound email notifications.
//!
//! [`Notifier`] is the collaborator the email backend talks to. Two
//! implementations ship here:
//!
//! - [`NotifyClient`]: the GOV.UK Notify REST API
//! - [`MemoryNotifier`]: records sends in memory, for tests and local development
//!
//! ## Example
//!
//! ```
//! use formulary_notify::{MemoryNotifier, Notifier, Personalisation};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let notifier = MemoryNotifier::new();
//!
//! let mut personalisation = Personalisation::new();
//! personalisation.insert("form_name".to_string(), "feedback".to_string());
//!
//! notifier
//!     .send("template-id", "team@example.gov.uk", &personalisation)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(notifier.sent().len(), 1);
//! # }
//! ```

pub mod client;
pub mod error;
pub mod memory;
pub mod notifier;

pub use client::{ApiKey, NotifyClient};
pub use error::{NotifyError, NotifyResult};
pub use memory::{MemoryNotifier, SentNotification};
pub use notifier::{DeliveryReceipt, Notifier, Personalisation};
