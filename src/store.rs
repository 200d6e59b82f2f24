//! Token cache contract and built-in backends.
//!
//! The engine keeps one token per integration in a [`TokenStore`] under a [`CacheKey`] so the
//! token survives process restarts and can be shared between engine instances. Backends report
//! a missing key through [`StoreError::Missing`]; every other error is a malfunction that the
//! engine surfaces as [`Error::CacheUnavailable`](crate::error::Error::CacheUnavailable).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AppId};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Keyed persistence capability backing the engine's token cache.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns `true` when a value is stored under `key`.
	fn has<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool>;

	/// Fetches the value stored under `key`, failing with [`StoreError::Missing`] when absent.
	fn get<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, String>;

	/// Persists or replaces the value stored under `key`.
	fn set<'a>(&'a self, key: &'a CacheKey, value: String) -> StoreFuture<'a, ()>;

	/// Removes the value stored under `key`, returning whether one existed.
	fn delete<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// No value is stored under the key. This is the only "absent" signal.
	#[error("No cached value for `{key}`.")]
	Missing {
		/// Key that was looked up.
		key: String,
	},
	/// The backend refused access to the entry or its location.
	#[error("Permission denied: {message}.")]
	PermissionDenied {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl StoreError {
	/// Returns `true` for the legitimate "key absent" signal.
	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing { .. })
	}
}

/// Cache key holding the token of one integration: `"OpenApiToken " + app_id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);
impl CacheKey {
	const PREFIX: &'static str = "OpenApiToken";

	/// Builds the token key for the provided integration.
	pub fn token(app_id: &AppId) -> Self {
		Self(format!("{} {app_id}", Self::PREFIX))
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
