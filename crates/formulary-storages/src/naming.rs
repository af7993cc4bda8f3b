//! Storage names for uploaded files.

use crate::{Result, StorageError};

/// Build the storage name for an uploaded file.
///
/// Only the last path component of `filename` is kept, whichever separator
/// the client used. The result is placed under `upload_to` (which may be
/// empty).
///
/// # Examples
///
/// ```
/// use formulary_storages::upload_path;
///
/// assert_eq!(upload_path("", "photo.jpg").unwrap(), "photo.jpg");
/// assert_eq!(upload_path("/uploads/", "C:\\Users\\me\\photo.jpg").unwrap(), "uploads/photo.jpg");
/// assert!(upload_path("uploads", "..").is_err());
/// ```
pub fn upload_path(upload_to: &str, filename: &str) -> Result<String> {
	let base = filename
		.rsplit(['/', '\\'])
		.next()
		.unwrap_or_default()
		.trim();

	if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
		return Err(StorageError::InvalidName(filename.to_string()));
	}

	let prefix = upload_to.trim_matches('/');
	if prefix.is_empty() {
		Ok(base.to_string())
	} else {
		Ok(format!("{}/{}", prefix, base))
	}
}

/// Reject names that would resolve outside the store root.
pub(crate) fn validate_name(name: &str) -> Result<()> {
	let escapes = name.is_empty()
		|| name.starts_with('/')
		|| name.contains('\\')
		|| name.contains('\0')
		|| name.split('/').any(|part| part == "..");
	if escapes {
		return Err(StorageError::InvalidName(name.to_string()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "report.pdf", "report.pdf")]
	#[case("uploads", "report.pdf", "uploads/report.pdf")]
	#[case("uploads", "../../etc/passwd", "uploads/passwd")]
	#[case("uploads", "C:\\fakepath\\cv.docx", "uploads/cv.docx")]
	#[case("a/b/", " notes.txt ", "a/b/notes.txt")]
	fn test_upload_path(#[case] upload_to: &str, #[case] filename: &str, #[case] expected: &str) {
		assert_eq!(upload_path(upload_to, filename).unwrap(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("dir/")]
	#[case(".")]
	#[case("..")]
	fn test_upload_path_rejects(#[case] filename: &str) {
		assert!(matches!(
			upload_path("uploads", filename),
			Err(StorageError::InvalidName(_))
		));
	}

	#[rstest]
	#[case("/etc/passwd")]
	#[case("uploads/../../secret")]
	#[case("..\\secret")]
	#[case("")]
	fn test_validate_name_rejects(#[case] name: &str) {
		assert!(validate_name(name).is_err());
	}

	#[test]
	fn test_validate_name_accepts_nested() {
		assert!(validate_name("uploads/2024/report.pdf").is_ok());
	}
}
