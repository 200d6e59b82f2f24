// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for engine activity.
#[derive(Debug, Default)]
pub struct EngineMetrics {
	requests: AtomicU64,
	token_fetches: AtomicU64,
	retries: AtomicU64,
	failures: AtomicU64,
}
impl EngineMetrics {
	/// Returns the number of logical requests started.
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of calls made to the `Token` resource.
	pub fn token_fetches(&self) -> u64 {
		self.token_fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of requests re-issued after a token refresh.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns the number of logical requests that failed.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_token_fetch(&self) {
		self.token_fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
