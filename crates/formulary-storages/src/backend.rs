//! The content store contract.

use crate::Result;
use async_trait::async_trait;

/// Content store for uploaded file bytes.
///
/// Names are relative, `/`-separated paths such as `evidence/passport.pdf`.
/// Use [`upload_path`](crate::upload_path) to build one from an untrusted
/// client file name.
///
/// # Examples
///
/// ```rust
/// use formulary_storages::{MemoryStorage, StorageBackend, Result};
///
/// async fn keep_evidence(store: &dyn StorageBackend) -> Result<u64> {
///     let name = store.save("evidence/scan.png", b"\x89PNG").await?;
///     store.size(&name).await
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// assert_eq!(keep_evidence(&MemoryStorage::new()).await.unwrap(), 4);
/// # }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Writes `content` under `name`, overwriting, and returns the stored name.
	///
	/// # Errors
	///
	/// `StorageError::InvalidName` for names that leave the store, otherwise
	/// `StorageError::Io` when the write fails.
	async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

	/// # Errors
	///
	/// `StorageError::NotFound` for an unknown name.
	async fn open(&self, name: &str) -> Result<Vec<u8>>;

	/// Removes the stored content; deleting an unknown name is `NotFound`.
	async fn delete(&self, name: &str) -> Result<()>;

	async fn exists(&self, name: &str) -> Result<bool>;

	/// Stored length in bytes
	async fn size(&self, name: &str) -> Result<u64>;
}
