// std
use std::{env, fs, process};
// self
use fiscal_open_api::{
	auth::AppId,
	store::{CacheKey, FileStore, MemoryStore, TokenStore},
};

fn key(app_id: &str) -> CacheKey {
	CacheKey::token(&AppId::new(app_id).expect("App identifier fixture should be valid."))
}

async fn exercise(store: &dyn TokenStore) {
	let key = key("app-store-it");

	assert!(!store.has(&key).await.expect("Lookup on an empty store should succeed."));

	store.set(&key, "token-1".into()).await.expect("Storing a token should succeed.");

	assert!(store.has(&key).await.expect("Lookup should succeed."));
	assert_eq!(store.get(&key).await.expect("Stored token should be readable."), "token-1");

	store.set(&key, "token-2".into()).await.expect("Replacing a token should succeed.");

	assert_eq!(store.get(&key).await.expect("Replaced token should be readable."), "token-2");
	assert!(store.delete(&key).await.expect("Deleting should succeed."));
	assert!(store.get(&key).await.expect_err("Deleted token should be missing.").is_missing());
}

#[tokio::test]
async fn memory_store_round_trip() {
	exercise(&MemoryStore::default()).await;
}

#[tokio::test]
async fn memory_store_clones_share_entries() {
	let store = MemoryStore::default();
	let clone = store.clone();
	let key = key("app-shared");

	store.set(&key, "shared".into()).await.expect("Storing a token should succeed.");

	assert_eq!(clone.get(&key).await.expect("Clone should observe the entry."), "shared");
	assert_eq!(clone.len(), 1);
}

#[tokio::test]
async fn file_store_round_trip() {
	let dir = env::temp_dir().join(format!("fiscal_open_api_store_it_{}", process::id()));

	exercise(&FileStore::open(&dir).expect("File store should open.")).await;

	fs::remove_dir_all(&dir).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store directory {}: {e}", dir.display())
	});
}
