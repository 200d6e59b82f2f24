//! Client-level error types shared across the engine, transports, and token stores.

// self
use crate::{_prelude::*, auth::CredentialsError, store::StoreError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Only `401`/`403` responses are recovered locally (one token refresh plus one retry); every
/// variant here is terminal for the logical call that produced it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token cache backend malfunctioned; never treated as "no cached token".
	#[error("Token cache is unavailable: {0}")]
	CacheUnavailable(
		#[from]
		#[source]
		StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Authentication failed and cannot heal by refreshing the token.
	#[error("Authentication failed: {reason}.")]
	Auth {
		/// HTTP status that triggered the failure, when one was received.
		status: Option<u16>,
		/// Server- or client-supplied reason string.
		reason: String,
	},
	/// Remote service answered with HTTP 500.
	#[error("Remote service failed with status {status}.")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Remote service answered with a status the client does not understand.
	#[error("Remote service returned unexpected status {status}.")]
	Protocol {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Response body could not be decoded as JSON.
	#[error("Response body for status {status} is not valid JSON.")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure pointing at the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Auth { status, .. } => *status,
			Self::Server { status, .. } | Self::Protocol { status, .. } | Self::Decode { status, .. } =>
				Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No transport was configured and the default one is disabled.
	#[error("No HTTP transport is configured; enable the `reqwest` feature or supply one.")]
	MissingTransport,
	/// Credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// Resource path cannot be appended to the account URL.
	#[error("Resource `{resource}` cannot be appended to the account URL.")]
	InvalidResource {
		/// Offending resource path.
		resource: String,
	},
	/// Command payload could not be serialized.
	#[error("Request parameters could not be serialized.")]
	Encode(#[from] serde_json::Error),
	/// Command payload did not serialize into a JSON object.
	#[error("Request parameters must serialize into a JSON object.")]
	NotAnObject,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts). None of them are retried by the engine.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the transport's deadline.
	#[error("Request timed out while calling the remote service.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
