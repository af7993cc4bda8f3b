//! Integration tests for LocalStorage backend.

use formulary_storages::{LocalStorage, StorageBackend, StorageError, upload_path};
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Temp directory plus a storage rooted in it; the directory lives as long as the fixture.
struct LocalTestDir {
	temp_dir: TempDir,
	storage: LocalStorage,
}

#[fixture]
fn local_dir() -> LocalTestDir {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let storage = LocalStorage::new(temp_dir.path()).expect("Failed to create local backend");
	LocalTestDir { temp_dir, storage }
}

#[rstest]
#[tokio::test]
async fn test_save_and_open(local_dir: LocalTestDir) {
	let path = local_dir
		.storage
		.save("test_open.txt", b"Hello, LocalStorage!")
		.await
		.expect("Failed to save file");

	assert_eq!(path, "test_open.txt");
	let content = local_dir.storage.open(&path).await.expect("Failed to open");
	assert_eq!(content, b"Hello, LocalStorage!");
	assert!(local_dir.temp_dir.path().join("test_open.txt").is_file());
}

#[rstest]
#[tokio::test]
async fn test_save_creates_upload_directory(local_dir: LocalTestDir) {
	let name = upload_path("evidence", "/home/user/scan.png").unwrap();

	local_dir.storage.save(&name, &[0u8, 1, 2, 255]).await.unwrap();

	assert!(local_dir.temp_dir.path().join("evidence/scan.png").is_file());
	assert_eq!(local_dir.storage.size(&name).await.unwrap(), 4);
}

#[rstest]
#[tokio::test]
async fn test_save_overwrites(local_dir: LocalTestDir) {
	local_dir.storage.save("cv.txt", b"first").await.unwrap();
	local_dir.storage.save("cv.txt", b"second").await.unwrap();

	assert_eq!(local_dir.storage.open("cv.txt").await.unwrap(), b"second");
}

#[rstest]
#[tokio::test]
async fn test_delete(local_dir: LocalTestDir) {
	local_dir.storage.save("tmp.txt", b"temporary").await.unwrap();
	assert!(local_dir.storage.exists("tmp.txt").await.unwrap());

	local_dir.storage.delete("tmp.txt").await.unwrap();

	assert!(!local_dir.storage.exists("tmp.txt").await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_missing_file_errors(local_dir: LocalTestDir) {
	assert!(matches!(
		local_dir.storage.open("missing.txt").await,
		Err(StorageError::NotFound(_))
	));
	assert!(matches!(
		local_dir.storage.delete("missing.txt").await,
		Err(StorageError::NotFound(_))
	));
	assert!(matches!(
		local_dir.storage.size("missing.txt").await,
		Err(StorageError::NotFound(_))
	));
}

#[rstest]
#[tokio::test]
async fn test_rejects_parent_traversal(local_dir: LocalTestDir) {
	let result = local_dir.storage.save("../outside.txt", b"nope").await;
	assert!(matches!(result, Err(StorageError::InvalidName(_))));
}

#[test]
fn test_missing_root_is_config_error() {
	let temp_dir = TempDir::new().unwrap();
	let result = LocalStorage::new(temp_dir.path().join("does-not-exist"));
	assert!(matches!(result, Err(StorageError::ConfigError(_))));
}

#[test]
fn test_root_must_be_directory() {
	let temp_dir = TempDir::new().unwrap();
	let file = temp_dir.path().join("file.txt");
	std::fs::write(&file, b"x").unwrap();

	assert!(matches!(
		LocalStorage::new(&file),
		Err(StorageError::ConfigError(_))
	));
}
