//! File upload input

use crate::data::RawValue;
use crate::field::{FieldBase, FieldError, FieldResult, FormField};
use async_trait::async_trait;
use formulary_storages::{StorageBackend, upload_path};
use serde_json::Value;
use std::sync::Arc;

/// File upload.
///
/// The bytes are written to the content store when the field is cleaned,
/// not when the value is assigned. The cleaned value is the stored name.
///
/// # Examples
///
/// ```
/// use formulary_forms::{FileUpload, FormField, RawValue, UploadedFile};
/// use formulary_storages::{MemoryStorage, StorageBackend};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let storage = Arc::new(MemoryStorage::new());
/// let mut field = FileUpload::new("evidence", storage.clone()).upload_to("evidence");
///
/// field.set_value(RawValue::File(UploadedFile::new("scan.png", "image/png", b"png".to_vec())));
/// assert_eq!(field.error(), "");
///
/// assert_eq!(field.clean().await.unwrap(), "evidence/scan.png");
/// assert!(storage.exists("evidence/scan.png").await.unwrap());
/// # }
/// ```
#[derive(Clone)]
pub struct FileUpload {
	base: FieldBase,
	storage: Arc<dyn StorageBackend>,
	pub upload_to: String,
}

impl std::fmt::Debug for FileUpload {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FileUpload")
			.field("base", &self.base)
			.field("upload_to", &self.upload_to)
			.finish_non_exhaustive()
	}
}

impl FileUpload {
	pub fn new(name: impl Into<String>, storage: Arc<dyn StorageBackend>) -> Self {
		Self {
			base: FieldBase::new(name),
			storage,
			upload_to: String::new(),
		}
	}

	/// Directory inside the content store
	pub fn upload_to(mut self, upload_to: impl Into<String>) -> Self {
		self.upload_to = upload_to.into();
		self
	}
}

#[async_trait]
impl FormField for FileUpload {
	fn base(&self) -> &FieldBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut FieldBase {
		&mut self.base
	}

	/// Only an actual file with a name counts as submitted
	fn is_missing(&self, raw: &RawValue) -> bool {
		!matches!(raw, RawValue::File(file) if !file.filename.trim().is_empty())
	}

	fn check(&self, _raw: &RawValue) -> Option<String> {
		None
	}

	async fn clean(&self) -> FieldResult<Value> {
		let Some(file) = self.base.value.file() else {
			return Ok(Value::Null);
		};
		if file.filename.trim().is_empty() {
			return Ok(Value::Null);
		}

		let storage_error = |source| FieldError::Storage {
			field: self.base.name.clone(),
			source,
		};
		let name = upload_path(&self.upload_to, &file.filename).map_err(storage_error)?;
		let stored = self
			.storage
			.save(&name, &file.content)
			.await
			.map_err(storage_error)?;
		Ok(Value::String(stored))
	}
}
