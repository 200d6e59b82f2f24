//! Token lifecycle: lazy load, singleflight refresh, and cache write-through.
//!
//! Refreshes for one engine (and all of its clones) are serialized behind a single async guard.
//! A caller whose token was rejected first checks whether someone else already replaced it,
//! either in memory or in the shared [`TokenStore`](crate::store::TokenStore), before asking
//! the `Token` resource for a new one. Concurrent rejections of the same token therefore cost
//! exactly one token fetch.

// self
use crate::{
	_prelude::*,
	auth::Token,
	engine::{RequestEngine, RequestEnvelope, Resource, Step, body_message},
	http::Method,
	obs::LogContext,
	params::RequestParams,
	store::StoreError,
};

/// In-memory token plus the guard serializing refreshes.
#[derive(Debug, Default)]
pub(crate) struct TokenSession {
	current: RwLock<Option<Token>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenSession {
	pub(crate) fn current(&self) -> Option<Token> {
		self.current.read().clone()
	}

	fn replace(&self, token: Option<Token>) {
		*self.current.write() = token;
	}
}

impl RequestEngine {
	/// Returns the current token, loading it from the cache or fetching a new one on first use.
	///
	/// Calling this eagerly warms the engine so the first request does not pay for the lookup.
	pub async fn ensure_token(&self) -> Result<Token> {
		if let Some(token) = self.session.current() {
			return Ok(token);
		}

		let _guard = self.session.refresh_guard.lock().await;

		if let Some(token) = self.session.current() {
			return Ok(token);
		}
		if let Some(token) = self.load_cached_token().await? {
			self.session.replace(Some(token.clone()));

			return Ok(token);
		}

		self.fetch_token().await
	}

	/// Fetches a new token unconditionally, replacing both the cached and the in-memory value.
	pub async fn refresh_token(&self) -> Result<Token> {
		let _guard = self.session.refresh_guard.lock().await;

		self.fetch_token().await
	}

	/// Returns the in-memory token without touching the cache or the network.
	pub fn current_token(&self) -> Option<Token> {
		self.session.current()
	}

	/// Drops the in-memory token and deletes the cached one, returning whether a cached entry
	/// existed.
	pub async fn forget_token(&self) -> Result<bool> {
		let _guard = self.session.refresh_guard.lock().await;

		self.session.replace(None);

		self.store.delete(&self.cache_key).await.map_err(|e| self.cache_failure(e, "delete"))
	}

	pub(crate) async fn refresh_rejected(&self, rejected: &Token) -> Result<Token> {
		let _guard = self.session.refresh_guard.lock().await;

		// Another caller may have refreshed while this one waited.
		if let Some(current) = self.session.current().filter(|current| current != rejected) {
			return Ok(current);
		}
		// Another engine sharing the cache may have refreshed already.
		if let Some(cached) = self.load_cached_token().await?.filter(|cached| cached != rejected) {
			self.session.replace(Some(cached.clone()));

			return Ok(cached);
		}

		self.fetch_token().await
	}

	// Callers must hold the refresh guard.
	async fn fetch_token(&self) -> Result<Token> {
		let envelope =
			RequestEnvelope::new(Method::Get, Resource::Token, RequestParams::new()).app_only();

		self.metrics.record_token_fetch();

		let (status, body) = match self.attempt(&envelope, None).await {
			Step::Accepted { status, body } => (status, body),
			Step::NeedsRefresh { status } =>
				return Err(Error::Auth {
					status: Some(status),
					reason: "Token request was rejected".into(),
				}),
			Step::Failed(e) => return Err(e),
		};
		let token = match body.get("token").and_then(Value::as_str).map(str::trim) {
			Some(token) if !token.is_empty() => Token::new(token),
			_ => {
				let reason =
					body_message(&body).unwrap_or("Token response carried no token").to_owned();

				self.logger.error(
					"Token response carried no token.",
					&LogContext::new().with("status", status),
				);

				return Err(Error::Auth { status: Some(status), reason });
			},
		};

		self.store
			.set(&self.cache_key, token.expose().to_owned())
			.await
			.map_err(|e| self.cache_failure(e, "write"))?;
		self.session.replace(Some(token.clone()));

		Ok(token)
	}

	async fn load_cached_token(&self) -> Result<Option<Token>> {
		let present =
			self.store.has(&self.cache_key).await.map_err(|e| self.cache_failure(e, "inspect"))?;

		if !present {
			return Ok(None);
		}

		match self.store.get(&self.cache_key).await {
			Ok(value) if value.trim().is_empty() => {
				self.logger.warning(
					"Ignoring empty cached token.",
					&LogContext::new().with("key", &self.cache_key),
				);

				Ok(None)
			},
			Ok(value) => Ok(Some(Token::new(value.trim()))),
			Err(e) if e.is_missing() => Ok(None),
			Err(e) => Err(self.cache_failure(e, "read")),
		}
	}

	fn cache_failure(&self, e: StoreError, action: &'static str) -> Error {
		self.logger.error(
			"Token cache is unavailable.",
			&LogContext::new().with("key", &self.cache_key).with("action", action).with("error", &e),
		);

		e.into()
	}
}
