//! Directory-backed [`TokenStore`] that keeps one file per key, so tokens survive restarts.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{CacheKey, StoreError, StoreFuture, TokenStore},
};

/// Persists each cache entry into its own file under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
	dir: PathBuf,
}
impl FileStore {
	/// Opens (or creates) a store rooted at `dir`.
	pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let dir = dir.into();

		fs::create_dir_all(&dir).map_err(|e| io_error(&e, "create store directory", &dir))?;

		Ok(Self { dir })
	}

	/// Returns the directory entries are stored under.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Returns the file holding `key`.
	pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
		self.dir.join(file_name(key))
	}

	fn has_now(&self, key: &CacheKey) -> Result<bool, StoreError> {
		let path = self.entry_path(key);

		path.try_exists().map_err(|e| io_error(&e, "inspect", &path))
	}

	fn get_now(&self, key: &CacheKey) -> Result<String, StoreError> {
		let path = self.entry_path(key);

		fs::read_to_string(&path).map_err(|e| match e.kind() {
			ErrorKind::NotFound => StoreError::Missing { key: key.to_string() },
			_ => io_error(&e, "read", &path),
		})
	}

	fn set_now(&self, key: &CacheKey, value: &str) -> Result<(), StoreError> {
		let path = self.entry_path(key);
		let tmp_path = self.dir.join(format!("{}.tmp", file_name(key)));

		{
			let mut file =
				File::create(&tmp_path).map_err(|e| io_error(&e, "create", &tmp_path))?;

			file.write_all(value.as_bytes()).map_err(|e| io_error(&e, "write", &tmp_path))?;
			file.sync_all().map_err(|e| io_error(&e, "sync", &tmp_path))?;
		}

		fs::rename(&tmp_path, &path).map_err(|e| io_error(&e, "replace", &path))
	}

	fn delete_now(&self, key: &CacheKey) -> Result<bool, StoreError> {
		let path = self.entry_path(key);

		match fs::remove_file(&path) {
			Ok(()) => Ok(true),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
			Err(e) => Err(io_error(&e, "remove", &path)),
		}
	}
}
impl TokenStore for FileStore {
	fn has<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool> {
		Box::pin(async move { self.has_now(key) })
	}

	fn get<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, String> {
		Box::pin(async move { self.get_now(key) })
	}

	fn set<'a>(&'a self, key: &'a CacheKey, value: String) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.set_now(key, &value) })
	}

	fn delete<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool> {
		Box::pin(async move { self.delete_now(key) })
	}
}

// Bytes outside `[A-Za-z0-9._-]` are written as `%XX`, which keeps distinct keys distinct.
fn file_name(key: &CacheKey) -> String {
	let mut name = String::with_capacity(key.as_str().len());

	for byte in key.as_str().bytes() {
		if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
			name.push(char::from(byte));
		} else {
			name.push_str(&format!("%{byte:02X}"));
		}
	}

	name
}

fn io_error(e: &std::io::Error, action: &str, path: &Path) -> StoreError {
	let message = format!("Failed to {action} {}: {e}", path.display());

	match e.kind() {
		ErrorKind::PermissionDenied => StoreError::PermissionDenied { message },
		_ => StoreError::Backend { message },
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;
	use crate::auth::AppId;

	fn temp_dir() -> PathBuf {
		let unique = format!(
			"fiscal_open_api_file_store_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn key(app_id: &str) -> CacheKey {
		CacheKey::token(&AppId::new(app_id).expect("App fixture should be valid."))
	}

	#[tokio::test]
	async fn set_and_reopen_round_trip() {
		let dir = temp_dir();
		let store = FileStore::open(&dir).expect("Failed to open file store.");
		let key = key("app-file");

		assert!(!store.has(&key).await.expect("Lookup on an empty store should succeed."));
		assert!(
			store.get(&key).await.expect_err("Missing entry should be reported.").is_missing()
		);

		store.set(&key, "token-1".into()).await.expect("Failed to persist token.");
		drop(store);

		let reopened = FileStore::open(&dir).expect("Failed to reopen file store.");

		assert!(reopened.has(&key).await.expect("Lookup should succeed."));
		assert_eq!(reopened.get(&key).await.expect("Token should be readable."), "token-1");

		reopened.set(&key, "token-2".into()).await.expect("Failed to replace token.");

		assert_eq!(reopened.get(&key).await.expect("Token should be readable."), "token-2");
		assert!(reopened.delete(&key).await.expect("Delete should succeed."));
		assert!(!reopened.delete(&key).await.expect("Second delete should succeed."));

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn file_names_escape_unsafe_bytes() {
		assert_eq!(file_name(&key("app:1")), "OpenApiToken%20app%3A1");
		assert_ne!(file_name(&key("a%3A")), file_name(&key("a:")));
	}

	#[tokio::test]
	async fn unreadable_entry_is_not_reported_as_missing() {
		let dir = temp_dir();
		let store = FileStore::open(&dir).expect("Failed to open file store.");
		let key = key("app-dir");

		// A directory where the entry file should be cannot be read as a token.
		fs::create_dir_all(store.entry_path(&key)).expect("Failed to create blocking directory.");

		let err = store.get(&key).await.expect_err("Reading a directory should fail.");

		assert!(!err.is_missing());

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}
