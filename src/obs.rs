//! Logging sink and optional observability helpers for engine requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `fiscal_open_api.request` with the `resource` and
//!   `stage` fields, and to route [`TracingLogger`] records into `tracing` events.
//! - Enable `metrics` to increment the `fiscal_open_api_request_total` counter for every
//!   attempt/success/failure, labeled by `resource` + `outcome`.

mod log;
mod metrics;
mod tracing;

pub use log::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each logical request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to [`RequestEngine::request`](crate::engine::RequestEngine::request).
	Attempt,
	/// The response was accepted (including application-level error payloads).
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
