//! Process-local content store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::naming::validate_name;
use crate::{Result, StorageBackend, StorageError};

/// Keeps uploads in a map; clones see the same map. Meant for tests and
/// demos.
///
/// # Examples
///
/// ```
/// use formulary_storages::{MemoryStorage, StorageBackend};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStorage::new();
/// store.save("a.txt", b"abc").await.unwrap();
/// assert_eq!(store.open("a.txt").await.unwrap(), b"abc");
/// assert_eq!(store.names(), vec!["a.txt".to_string()]);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	contents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stored names, sorted
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.contents.read().keys().cloned().collect();
		names.sort();
		names
	}
}

#[async_trait]
impl StorageBackend for MemoryStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		validate_name(name)?;
		self.contents.write().insert(name.to_string(), content.to_vec());
		Ok(name.to_string())
	}

	async fn open(&self, name: &str) -> Result<Vec<u8>> {
		self.contents
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| StorageError::NotFound(name.to_string()))
	}

	async fn delete(&self, name: &str) -> Result<()> {
		self.contents
			.write()
			.remove(name)
			.map(|_| ())
			.ok_or_else(|| StorageError::NotFound(name.to_string()))
	}

	async fn exists(&self, name: &str) -> Result<bool> {
		Ok(self.contents.read().contains_key(name))
	}

	async fn size(&self, name: &str) -> Result<u64> {
		self.contents
			.read()
			.get(name)
			.map(|content| content.len() as u64)
			.ok_or_else(|| StorageError::NotFound(name.to_string()))
	}
}
