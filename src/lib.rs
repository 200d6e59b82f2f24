//! Signed, token-authenticated client for fiscal-register Open API services: request signing,
//! transparent token refresh, and pluggable token caches in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod commands;
pub mod engine;
pub mod error;
pub mod http;
pub mod obs;
pub mod params;
pub mod sign;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fakes for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		auth::Credentials,
		error::TransportError,
		http::{HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportFuture},
		obs::{LogContext, LogLevel, Logger},
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		engine::RequestEngine,
		http::ReqwestTransport,
		store::{MemoryStore, TokenStore},
	};

	/// Builds credentials pointing at `account` with fixed test identity values.
	pub fn test_credentials(account: &str) -> Credentials {
		Credentials::builder()
			.account(account)
			.app_id("app-test")
			.secret("secret-test")
			.build()
			.expect("Test credentials should be valid.")
	}

	/// Constructs a reqwest-backed [`RequestEngine`] with an in-memory store for integration
	/// tests against `httpmock`.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_engine(account: &str) -> (RequestEngine, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let engine = RequestEngine::builder(test_credentials(account))
			.transport(ReqwestTransport::default())
			.store(store)
			.build()
			.expect("Test engine should build.");

		(engine, store_backend)
	}

	/// Canned reply produced by a [`ScriptedTransport`].
	#[derive(Clone, Debug)]
	pub enum ScriptedReply {
		/// Responds with the provided status and body.
		Respond(u16, String),
		/// Fails the call with a transport error.
		Fail(&'static str),
	}
	impl ScriptedReply {
		/// JSON response helper.
		pub fn json(status: u16, body: &str) -> Self {
			Self::Respond(status, body.into())
		}
	}

	/// Fake transport replying from per-resource queues and recording every request it saw.
	///
	/// The last reply queued for a resource repeats once its queue drains.
	#[derive(Clone, Default)]
	pub struct ScriptedTransport {
		replies: Arc<Mutex<HashMap<String, VecDeque<ScriptedReply>>>>,
		requests: Arc<Mutex<Vec<HttpRequest>>>,
	}
	impl ScriptedTransport {
		/// Queues a reply for requests whose URL path ends with `resource` (e.g. `/Token`).
		pub fn reply(self, resource: &str, reply: ScriptedReply) -> Self {
			self.replies.lock().entry(resource.into()).or_default().push_back(reply);

			self
		}

		/// Returns every request dispatched so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}

		/// Counts requests whose URL path ends with `resource`.
		pub fn calls(&self, resource: &str) -> usize {
			self.requests.lock().iter().filter(|r| r.url.path().ends_with(resource)).count()
		}

		/// Returns the `token` parameter of every request sent to `resource`, in order.
		pub fn tokens_sent(&self, resource: &str) -> Vec<Option<String>> {
			self.requests
				.lock()
				.iter()
				.filter(|r| r.url.path().ends_with(resource))
				.map(|r| r.param("token"))
				.collect()
		}

		fn next_reply(&self, path: &str) -> ScriptedReply {
			let mut replies = self.replies.lock();
			let Some(queue) = replies
				.iter_mut()
				.find(|(resource, _)| path.ends_with(resource.as_str()))
				.map(|(_, queue)| queue)
			else {
				return ScriptedReply::json(404, "{\"message\":\"not scripted\"}");
			};

			if queue.len() > 1 {
				queue.pop_front().unwrap_or(ScriptedReply::Fail("empty script"))
			} else {
				queue.front().cloned().unwrap_or(ScriptedReply::Fail("empty script"))
			}
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
			Box::pin(async move {
				let path = request.url.path().to_owned();

				self.requests.lock().push(request);

				match self.next_reply(&path) {
					ScriptedReply::Respond(status, body) =>
						Ok(HttpResponse { status, body: body.into_bytes() }),
					ScriptedReply::Fail(message) => Err(TransportError::network(
						std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message),
					)),
				}
			})
		}
	}

	impl HttpRequest {
		/// Looks up a parameter in either the query pairs or the JSON body.
		pub fn param(&self, name: &str) -> Option<String> {
			match &self.body {
				RequestBody::Query(pairs) =>
					pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone()),
				RequestBody::Json(bytes) => serde_json::from_slice::<serde_json::Value>(bytes)
					.ok()?
					.get(name)
					.and_then(|value| value.as_str().map(str::to_owned)),
			}
		}
	}

	/// Logger that keeps every record for later assertions.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingLogger(Arc<Mutex<Vec<(LogLevel, String)>>>);
	impl RecordingLogger {
		/// Returns the recorded levels in emission order.
		pub fn levels(&self) -> Vec<LogLevel> {
			self.0.lock().iter().map(|(level, _)| *level).collect()
		}

		/// Returns the recorded records in emission order.
		pub fn records(&self) -> Vec<(LogLevel, String)> {
			self.0.lock().clone()
		}
	}
	impl Logger for RecordingLogger {
		fn write(&self, level: LogLevel, message: &str, _context: &LogContext) {
			self.0.lock().push((level, message.to_owned()));
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
