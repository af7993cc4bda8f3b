//! # formulary-storages
//!
//! Content store for uploaded files.
//!
//! A `FileUpload` field persists its bytes here when the form is cleaned and
//! records the returned path in the cleaned data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use formulary_storages::{LocalStorage, StorageBackend, upload_path};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = LocalStorage::new("media")?;
//!
//!     let name = upload_path("evidence", "../../etc/passport.pdf")?;
//!     assert_eq!(name, "evidence/passport.pdf");
//!
//!     storage.save(&name, b"%PDF-1.7").await?;
//!     assert!(storage.exists(&name).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod backends;
pub mod error;
pub mod naming;

pub use backend::StorageBackend;
pub use backends::{LocalStorage, MemoryStorage};
pub use error::{Result, StorageError};
pub use naming::upload_path;
