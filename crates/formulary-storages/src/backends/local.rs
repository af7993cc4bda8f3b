//! Uploads kept under a directory on disk.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::naming::validate_name;
use crate::{Result, StorageBackend, StorageError};

/// Stores each upload as a file below `root`, creating subdirectories on demand.
///
/// The root itself must already exist; a typo in `MEDIA_ROOT` should fail at
/// startup rather than silently create a new tree.
#[derive(Debug, Clone)]
pub struct LocalStorage {
	root: PathBuf,
}

impl LocalStorage {
	/// # Errors
	///
	/// `StorageError::ConfigError` when `root` is missing or is not a directory.
	pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
		let root = root.into();
		match std::fs::metadata(&root) {
			Ok(metadata) if metadata.is_dir() => Ok(Self { root }),
			Ok(_) => Err(StorageError::ConfigError(format!(
				"{} is a file, expected a directory",
				root.display()
			))),
			Err(_) => Err(StorageError::ConfigError(format!(
				"upload directory {} is missing",
				root.display()
			))),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn resolve(&self, name: &str) -> Result<PathBuf> {
		validate_name(name)?;
		Ok(self.root.join(name))
	}

	async fn metadata(&self, name: &str) -> Result<Option<std::fs::Metadata>> {
		let path = self.resolve(name)?;
		match fs::metadata(&path).await {
			Ok(metadata) if metadata.is_file() => Ok(Some(metadata)),
			Ok(_) => Ok(None),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	async fn require(&self, name: &str) -> Result<(PathBuf, std::fs::Metadata)> {
		match self.metadata(name).await? {
			Some(metadata) => Ok((self.resolve(name)?, metadata)),
			None => Err(StorageError::NotFound(name.to_string())),
		}
	}
}

#[async_trait]
impl StorageBackend for LocalStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		let target = self.resolve(name)?;
		if let Some(dir) = target.parent() {
			fs::create_dir_all(dir).await?;
		}
		fs::write(&target, content).await?;

		tracing::debug!(name, bytes = content.len(), "saved upload");
		Ok(name.to_string())
	}

	async fn open(&self, name: &str) -> Result<Vec<u8>> {
		let (path, _) = self.require(name).await?;
		Ok(fs::read(path).await?)
	}

	async fn delete(&self, name: &str) -> Result<()> {
		let (path, _) = self.require(name).await?;
		fs::remove_file(path).await?;
		tracing::debug!(name, "deleted upload");
		Ok(())
	}

	async fn exists(&self, name: &str) -> Result<bool> {
		Ok(self.metadata(name).await?.is_some())
	}

	async fn size(&self, name: &str) -> Result<u64> {
		let (_, metadata) = self.require(name).await?;
		Ok(metadata.len())
	}
}
