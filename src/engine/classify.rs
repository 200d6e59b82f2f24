//! Response status classification.

// self
use crate::{
	_prelude::*,
	engine::{Authentication, RequestEngine, RequestEnvelope},
	http::HttpResponse,
	obs::{LogContext, LogLevel},
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// How the engine treats a response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusClass {
	/// `200`: the body is returned to the caller.
	Success,
	/// `400`/`422`: the body carries an application-level error and is returned to the caller.
	Rejected,
	/// `401`: the token expired.
	TokenExpired,
	/// `403`: the token is not accepted for this request.
	Forbidden,
	/// `500`: the remote service failed.
	ServerFailure,
	/// Anything else.
	Unexpected,
}
impl StatusClass {
	/// Classifies an HTTP status code.
	pub const fn from_status(status: u16) -> Self {
		match status {
			200 => Self::Success,
			400 | 422 => Self::Rejected,
			401 => Self::TokenExpired,
			403 => Self::Forbidden,
			500 => Self::ServerFailure,
			_ => Self::Unexpected,
		}
	}

	/// Returns `true` when a token-authenticated request may heal by refreshing its token.
	pub const fn is_refreshable(self) -> bool {
		matches!(self, Self::TokenExpired | Self::Forbidden)
	}

	/// Returns `true` when the response body is handed back to the caller.
	pub const fn is_accepted(self) -> bool {
		matches!(self, Self::Success | Self::Rejected)
	}
}

/// Outcome of one signed round trip.
#[derive(Debug)]
pub(crate) enum Step {
	Accepted { status: u16, body: Value },
	NeedsRefresh { status: u16 },
	Failed(Error),
}
impl Step {
	/// Collapses the step into the caller-facing result; a refresh request at this point means
	/// the token was rejected again.
	pub(crate) fn finish(self) -> Result<Value> {
		match self {
			Step::Accepted { body, .. } => Ok(body),
			Step::NeedsRefresh { status } => Err(Error::Auth {
				status: Some(status),
				reason: "Token was rejected again after a refresh".into(),
			}),
			Step::Failed(e) => Err(e),
		}
	}
}

impl RequestEngine {
	// Every non-200 transition writes exactly one log record.
	pub(crate) fn classify(&self, envelope: &RequestEnvelope, response: &HttpResponse) -> Step {
		let status = response.status;
		let class = StatusClass::from_status(status);
		let context = LogContext::new()
			.with("resource", &envelope.resource)
			.with("method", envelope.method)
			.with("status", status);

		// Any rejection of the token resource is terminal.
		if envelope.auth == Authentication::AppOnly
			&& (class == StatusClass::Rejected || class.is_refreshable())
		{
			self.logger.error("Token request was rejected.", &context);

			return Step::Failed(Error::Auth { status: Some(status), reason: reason(response) });
		}
		if class.is_accepted() {
			return match response.decode() {
				Ok(body) => {
					if class == StatusClass::Rejected {
						self.logger.warning("Request rejected by the remote application.", &context);
					}

					Step::Accepted { status, body }
				},
				Err(e) => {
					let context = context.with("body", preview(response));

					self.logger.error("Response body is not valid JSON.", &context);

					Step::Failed(e)
				},
			};
		}
		if class.is_refreshable() {
			let (level, message) = match class {
				StatusClass::TokenExpired => (LogLevel::Info, "Token expired; refreshing."),
				_ => (LogLevel::Debug, "Token forbidden; refreshing."),
			};

			self.logger.write(level, message, &context);

			return Step::NeedsRefresh { status };
		}

		let body = preview(response);

		if class == StatusClass::ServerFailure {
			self.logger.critical("Remote service failed.", &context.with("body", &body));

			Step::Failed(Error::Server { status, body })
		} else {
			self.logger
				.error("Remote service returned an unexpected status.", &context.with("body", &body));

			Step::Failed(Error::Protocol { status, body })
		}
	}
}

pub(crate) fn body_message(body: &Value) -> Option<&str> {
	body.get("message").and_then(Value::as_str)
}

// Prefers the service's `message` field over the raw body.
fn reason(response: &HttpResponse) -> String {
	match response.decode() {
		Ok(body) => body_message(&body).map(str::to_owned).unwrap_or_else(|| preview(response)),
		Err(_) => preview(response),
	}
}

fn preview(response: &HttpResponse) -> String {
	let text = response.text();

	match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => format!("{}…", &text[..idx]),
		None => text,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn statuses_map_to_classes() {
		assert_eq!(StatusClass::from_status(200), StatusClass::Success);
		assert_eq!(StatusClass::from_status(400), StatusClass::Rejected);
		assert_eq!(StatusClass::from_status(422), StatusClass::Rejected);
		assert_eq!(StatusClass::from_status(401), StatusClass::TokenExpired);
		assert_eq!(StatusClass::from_status(403), StatusClass::Forbidden);
		assert_eq!(StatusClass::from_status(500), StatusClass::ServerFailure);

		for status in [201, 204, 302, 404, 418, 502, 503] {
			assert_eq!(StatusClass::from_status(status), StatusClass::Unexpected);
		}

		assert!(StatusClass::Forbidden.is_refreshable());
		assert!(!StatusClass::ServerFailure.is_refreshable());
		assert!(StatusClass::Rejected.is_accepted());
	}

	#[test]
	fn reason_prefers_message_field_and_truncates_raw_bodies() {
		let json = HttpResponse { status: 401, body: br#"{"message":"bad sign"}"#.to_vec() };

		assert_eq!(reason(&json), "bad sign");

		let long = HttpResponse { status: 401, body: "я".repeat(300).into_bytes() };
		let rendered = reason(&long);

		assert_eq!(rendered.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(rendered.ends_with('…'));
	}

	#[test]
	fn finish_turns_repeated_refresh_into_auth_error() {
		let err = Step::NeedsRefresh { status: 403 }.finish().expect_err("Should fail.");

		assert!(matches!(err, Error::Auth { status: Some(403), .. }));
	}
}
