//! Request engine: signing, dispatch, status classification, and token lifecycle.
//!
//! Every logical request walks a bounded state machine: the parameters are stamped and signed,
//! sent once, and the response classified. A `401`/`403` on a token-authenticated request
//! triggers exactly one token refresh followed by exactly one retry; nothing else is retried.

mod classify;
mod envelope;
mod metrics;
mod refresh;

pub use classify::*;
pub use envelope::*;
pub use metrics::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Nonce, Token},
	error::ConfigError,
	http::{HttpRequest, HttpTransport, Method, RequestBody},
	obs::{self, LogContext, Logger, RequestOutcome, RequestSpan, TracingLogger},
	params::RequestParams,
	sign::{SIGN_HEADER, Signer},
	store::{CacheKey, MemoryStore, TokenStore},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use refresh::TokenSession;

/// Coordinates signed requests against one account on behalf of one integration.
///
/// Clones share the in-memory token, the refresh guard, and the metrics, so a cloned engine
/// handed to another task still refreshes at most once per rejected token.
#[derive(Clone)]
pub struct RequestEngine {
	/// Shared counters for requests, token fetches, retries, and failures.
	pub metrics: Arc<EngineMetrics>,
	credentials: Credentials,
	signer: Signer,
	cache_key: CacheKey,
	transport: Arc<dyn HttpTransport>,
	store: Arc<dyn TokenStore>,
	logger: Arc<dyn Logger>,
	session: Arc<TokenSession>,
}
impl RequestEngine {
	/// Returns a builder for the provided credentials.
	pub fn builder(credentials: Credentials) -> RequestEngineBuilder {
		RequestEngineBuilder::new(credentials)
	}

	/// Returns the credentials the engine signs with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the key the engine caches its token under.
	pub fn cache_key(&self) -> &CacheKey {
		&self.cache_key
	}

	/// Sends a token-authenticated request and returns the decoded response body.
	///
	/// `app_id`, `nonce`, and `token` are filled in by the engine; caller values for those keys
	/// are replaced. Responses with status `200`, `400`, and `422` are returned as-is so callers
	/// can inspect application-level error payloads.
	pub async fn request(
		&self,
		method: Method,
		resource: impl Into<Resource>,
		params: RequestParams,
	) -> Result<Value> {
		self.execute(RequestEnvelope::new(method, resource, params)).await
	}

	/// Sends a fully described request.
	pub async fn execute(&self, envelope: RequestEnvelope) -> Result<Value> {
		let label = envelope.resource.label();
		let span = RequestSpan::new(label, "execute");

		obs::record_request_outcome(label, RequestOutcome::Attempt);
		self.metrics.record_request();

		let result = span.instrument(self.run(&envelope)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(label, RequestOutcome::Success),
			Err(_) => {
				self.metrics.record_failure();
				obs::record_request_outcome(label, RequestOutcome::Failure);
			},
		}

		result
	}

	async fn run(&self, envelope: &RequestEnvelope) -> Result<Value> {
		if envelope.auth == Authentication::AppOnly {
			return self.attempt(envelope, None).await.finish();
		}

		let token = self.ensure_token().await?;

		match self.attempt(envelope, Some(&token)).await {
			Step::NeedsRefresh { .. } => {
				let fresh = self.refresh_rejected(&token).await?;

				self.metrics.record_retry();

				self.attempt(envelope, Some(&fresh)).await.finish()
			},
			step => step.finish(),
		}
	}

	// One signed round trip: stamp, sign, send, classify.
	async fn attempt(&self, envelope: &RequestEnvelope, token: Option<&Token>) -> Step {
		let request = match self.prepare(envelope, token) {
			Ok(request) => request,
			Err(e) => return Step::Failed(e.into()),
		};

		match self.transport.send(request).await {
			Ok(response) => self.classify(envelope, &response),
			Err(e) => {
				self.logger.error(
					"Transport failure while calling the remote service.",
					&LogContext::new()
						.with("resource", &envelope.resource)
						.with("method", envelope.method)
						.with("error", &e),
				);

				Step::Failed(e.into())
			},
		}
	}

	fn prepare(
		&self,
		envelope: &RequestEnvelope,
		token: Option<&Token>,
	) -> Result<HttpRequest, ConfigError> {
		let mut params = envelope.params.clone();

		params.insert("app_id", self.credentials.app_id.as_ref());
		params.insert("nonce", Nonce::generate().as_str());

		match token {
			Some(token) => params.insert("token", token.expose()),
			None => params.remove("token"),
		};

		let url = self.endpoint(&envelope.resource)?;
		let (signature, body) = match envelope.method {
			Method::Get => {
				let signature = self.signer.sign_params(&params.as_transmitted_query()?)?;

				(signature, RequestBody::Query(params.to_query_pairs()?))
			},
			Method::Post => {
				let payload = params.encode()?;

				(self.signer.sign(&payload), RequestBody::Json(payload.into_bytes()))
			},
		};

		Ok(HttpRequest {
			method: envelope.method,
			url,
			headers: BTreeMap::from([(SIGN_HEADER.to_owned(), signature.to_string())]),
			body,
		})
	}

	fn endpoint(&self, resource: &Resource) -> Result<Url, ConfigError> {
		let segments = resource.segments();

		// `url` silently drops dot segments, which would retarget the request.
		if segments.is_empty() || segments.iter().any(|segment| matches!(*segment, "." | "..")) {
			return Err(ConfigError::InvalidResource { resource: resource.to_string() });
		}

		let mut url = self.credentials.account.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidResource { resource: resource.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl RequestEngine {
	/// Creates an engine with the default reqwest transport, an in-memory token cache, and the
	/// tracing-backed logger.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Self::builder(credentials).build()
	}
}
impl Debug for RequestEngine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestEngine")
			.field("account", &self.credentials.account.as_str())
			.field("app_id", &self.credentials.app_id)
			.field("cache_key", &self.cache_key)
			.field("token_loaded", &self.session.current().is_some())
			.finish()
	}
}

/// Builder for [`RequestEngine`].
pub struct RequestEngineBuilder {
	credentials: Credentials,
	transport: Option<Arc<dyn HttpTransport>>,
	store: Option<Arc<dyn TokenStore>>,
	logger: Option<Arc<dyn Logger>>,
}
impl RequestEngineBuilder {
	/// Creates a builder with every collaborator left at its default.
	pub fn new(credentials: Credentials) -> Self {
		Self { credentials, transport: None, store: None, logger: None }
	}

	/// Uses the provided transport.
	pub fn transport<T>(self, transport: T) -> Self
	where
		T: 'static + HttpTransport,
	{
		self.shared_transport(Arc::new(transport))
	}

	/// Uses a transport shared with other components.
	pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);

		self
	}

	/// Uses the provided token cache (defaults to a fresh [`MemoryStore`]).
	pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Uses the provided logger (defaults to [`TracingLogger`]).
	pub fn logger<L>(mut self, logger: L) -> Self
	where
		L: 'static + Logger,
	{
		self.logger = Some(Arc::new(logger));

		self
	}

	/// Builds the engine.
	pub fn build(self) -> Result<RequestEngine> {
		let transport = match self.transport {
			Some(transport) => transport,
			None => default_transport()?,
		};
		let store: Arc<dyn TokenStore> = match self.store {
			Some(store) => store,
			None => Arc::new(MemoryStore::default()),
		};
		let logger: Arc<dyn Logger> = match self.logger {
			Some(logger) => logger,
			None => Arc::new(TracingLogger),
		};

		Ok(RequestEngine {
			metrics: Default::default(),
			signer: Signer::new(self.credentials.secret.clone()),
			cache_key: CacheKey::token(&self.credentials.app_id),
			credentials: self.credentials,
			transport,
			store,
			logger,
			session: Default::default(),
		})
	}
}
impl Debug for RequestEngineBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestEngineBuilder")
			.field("account", &self.credentials.account.as_str())
			.field("transport_set", &self.transport.is_some())
			.field("store_set", &self.store.is_some())
			.field("logger_set", &self.logger.is_some())
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn default_transport() -> Result<Arc<dyn HttpTransport>, ConfigError> {
	Ok(Arc::new(ReqwestTransport::builder().build()?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport() -> Result<Arc<dyn HttpTransport>, ConfigError> {
	Err(ConfigError::MissingTransport)
}
