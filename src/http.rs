//! Transport primitives for signed Open API calls.
//!
//! The engine depends on HTTP only through [`HttpTransport`]: it hands over a fully built
//! [`HttpRequest`] (URL, `sign` header, query pairs or JSON body) and receives the raw status and
//! body back. Status interpretation stays in the engine, so transports must return every HTTP
//! response as `Ok`, reserving `Err` for failures where no response arrived.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration};
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to deliver a signed request.
///
/// Implementations must be `Send + Sync` so one transport can serve concurrent callers sharing an
/// engine.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Sends `request`, returning whatever status the server answered with.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the remote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// Parameters travel in the query string.
	Get,
	/// Parameters travel as a JSON body.
	Post,
}
impl Method {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parameter placement for an outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// Query pairs appended to the URL.
	Query(Vec<(String, String)>),
	/// UTF-8 JSON body.
	Json(Vec<u8>),
}

/// Fully assembled outbound request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: Method,
	/// Resource URL without query parameters.
	pub url: Url,
	/// Extra headers, including the `sign` header.
	pub headers: BTreeMap<String, String>,
	/// Signed parameters.
	pub body: RequestBody,
}
impl HttpRequest {
	/// Returns the header value for `name`, if present.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).map(String::as_str)
	}

	/// Returns the URL with query pairs applied, as it goes on the wire.
	pub fn wire_url(&self) -> Url {
		let mut url = self.url.clone();

		if let RequestBody::Query(pairs) = &self.body {
			if !pairs.is_empty() {
				url.query_pairs_mut().extend_pairs(pairs);
			}
		}

		url
	}
}

/// Raw response captured by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Decodes the body as JSON; an empty body decodes to `null`.
	pub fn decode(&self) -> Result<Value> {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Value::Null);
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { status: self.status, source })
	}

	/// Returns the body as text, replacing invalid UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Returns a builder for a configured client.
	pub fn builder() -> ReqwestTransportBuilder {
		ReqwestTransportBuilder::default()
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
			};
			let mut builder = self.0.request(method, request.wire_url());

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let RequestBody::Json(bytes) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

/// Builder for [`ReqwestTransport`].
#[cfg(feature = "reqwest")]
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
	timeout: Duration,
	user_agent: Option<String>,
}
#[cfg(feature = "reqwest")]
impl Default for ReqwestTransportBuilder {
	fn default() -> Self {
		Self { timeout: Duration::from_secs(30), user_agent: None }
	}
}
#[cfg(feature = "reqwest")]
impl ReqwestTransportBuilder {
	/// Overrides the per-request timeout (defaults to 30 seconds).
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets the `User-Agent` header.
	pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
		self.user_agent = Some(agent.into());

		self
	}

	/// Builds the transport.
	pub fn build(self) -> Result<ReqwestTransport, ConfigError> {
		let mut builder = ReqwestClient::builder().timeout(self.timeout);

		if let Some(agent) = self.user_agent {
			builder = builder.user_agent(agent);
		}

		Ok(ReqwestTransport(builder.build()?))
	}
}
