//! SQLite submission log

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formulary_forms::{Backend, BackendError, BackendResult, CleanedData, FormRequest};
use serde_json::Value;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tokio::sync::OnceCell;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS forms (
	id INTEGER PRIMARY KEY AUTOINCREMENT,
	name TEXT NOT NULL,
	created_on TEXT NOT NULL,
	data TEXT NOT NULL
)";

/// A stored submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
	pub id: i64,
	pub name: String,
	pub created_on: DateTime<Utc>,
	pub data: Value,
}

fn storage_error(e: impl std::fmt::Display) -> BackendError {
	BackendError::Storage(e.to_string())
}

/// Appends every submission to the `forms` table.
///
/// The table is created on first use. Rows are never updated or deleted.
///
/// # Examples
///
/// ```
/// use formulary_backends::DatabaseBackend;
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = DatabaseBackend::connect("sqlite::memory:").await.unwrap();
/// assert!(backend.submissions("feedback").await.unwrap().is_empty());
/// # }
/// ```
#[derive(Debug)]
pub struct DatabaseBackend {
	pool: SqlitePool,
	table: OnceCell<()>,
}

impl DatabaseBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool,
			table: OnceCell::new(),
		}
	}

	/// Open a pool for `url`, creating the database file if needed.
	///
	/// A single connection is used so that `sqlite::memory:` keeps one database.
	pub async fn connect(url: &str) -> BackendResult<Self> {
		let options = SqliteConnectOptions::from_str(url)
			.map_err(|e| BackendError::Configuration(e.to_string()))?
			.create_if_missing(true);
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect_with(options)
			.await
			.map_err(storage_error)?;
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	async fn ensure_table(&self) -> BackendResult<()> {
		self.table
			.get_or_try_init(|| async {
				sqlx::query(CREATE_TABLE)
					.execute(&self.pool)
					.await
					.map(|_| ())
					.map_err(storage_error)
			})
			.await?;
		Ok(())
	}

	/// Submissions of one form, oldest first
	pub async fn submissions(&self, name: &str) -> BackendResult<Vec<Submission>> {
		self.ensure_table().await?;
		let rows = sqlx::query("SELECT id, name, created_on, data FROM forms WHERE name = ? ORDER BY id")
			.bind(name)
			.fetch_all(&self.pool)
			.await
			.map_err(storage_error)?;

		rows.into_iter()
			.map(|row| {
				let data: String = row.try_get("data").map_err(storage_error)?;
				Ok(Submission {
					id: row.try_get("id").map_err(storage_error)?,
					name: row.try_get("name").map_err(storage_error)?,
					created_on: row.try_get("created_on").map_err(storage_error)?,
					data: serde_json::from_str(&data).map_err(storage_error)?,
				})
			})
			.collect()
	}
}

#[async_trait]
impl Backend for DatabaseBackend {
	async fn process(
		&self,
		_request: &mut FormRequest,
		name: &str,
		data: &CleanedData,
	) -> BackendResult<()> {
		self.ensure_table().await?;
		let json = serde_json::to_string(data).map_err(storage_error)?;

		let result = sqlx::query("INSERT INTO forms (name, created_on, data) VALUES (?, ?, ?)")
			.bind(name)
			.bind(Utc::now())
			.bind(&json)
			.execute(&self.pool)
			.await
			.map_err(storage_error)?;

		tracing::info!(form = name, id = result.last_insert_rowid(), "submission stored");
		Ok(())
	}
}
