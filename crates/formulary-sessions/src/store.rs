use crate::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque session identifier
pub type SessionId = String;

/// Where sessions live between requests.
///
/// Implementations only move whole sessions in and out. A load followed by a
/// save is not atomic.
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// `None` for an id that was never saved or has been deleted
	async fn load(&self, session_id: &SessionId) -> Option<Session>;

	async fn save(&self, session_id: &SessionId, session: &Session);

	async fn delete(&self, session_id: &SessionId);

	/// Fresh random id (UUID v4)
	fn create_session_id(&self) -> SessionId {
		Uuid::new_v4().to_string()
	}
}

/// Process-local store. Contents are lost on restart.
///
/// # Examples
///
/// ```
/// use formulary_sessions::{InMemorySessionStore, Session, SessionStore};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = InMemorySessionStore::new();
/// let id = store.create_session_id();
/// assert!(store.load(&id).await.is_none());
///
/// let mut session = Session::new();
/// session.set("answer", json!("yes"));
/// store.save(&id, &session).await;
/// assert_eq!(store.load(&id).await, Some(session));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
	entries: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.entries.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.entries.read().await.is_empty()
	}
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
	async fn load(&self, session_id: &SessionId) -> Option<Session> {
		self.entries.read().await.get(session_id).cloned()
	}

	async fn save(&self, session_id: &SessionId, session: &Session) {
		self.entries
			.write()
			.await
			.insert(session_id.clone(), session.clone());
	}

	async fn delete(&self, session_id: &SessionId) {
		self.entries.write().await.remove(session_id);
	}
}
