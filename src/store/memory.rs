//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{CacheKey, StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, String>>>;

/// Thread-safe storage backend that keeps tokens in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn get_now(map: &StoreMap, key: &CacheKey) -> Result<String, StoreError> {
		map.read().get(key).cloned().ok_or_else(|| StoreError::Missing { key: key.to_string() })
	}
}
impl TokenStore for MemoryStore {
	fn has<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().contains_key(key)) })
	}

	fn get<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, String> {
		let map = self.0.clone();

		Box::pin(async move { Self::get_now(&map, key) })
	}

	fn set<'a>(&'a self, key: &'a CacheKey, value: String) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key.to_owned(), value);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(key).is_some()) })
	}
}
