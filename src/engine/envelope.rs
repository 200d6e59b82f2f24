//! Logical request descriptions handed to the engine.

// self
use crate::{_prelude::*, auth::CommandId, http::Method, params::RequestParams};

/// Logical resource paths exposed by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
	/// `Token`: issues a fresh bearer token.
	Token,
	/// `StateSystem`: register and connectivity status.
	StateSystem,
	/// `Command`: submits commands (POST) or lists them (GET).
	Command,
	/// `Command/{id}`: status of one submitted command.
	CommandStatus(CommandId),
	/// Any other path beneath the account URL.
	Custom(String),
}
impl Resource {
	/// Returns the path segments appended to the account URL.
	pub fn segments(&self) -> Vec<&str> {
		match self {
			Resource::Token => vec!["Token"],
			Resource::StateSystem => vec!["StateSystem"],
			Resource::Command => vec!["Command"],
			Resource::CommandStatus(id) => vec!["Command", id.as_ref()],
			Resource::Custom(path) => path.split('/').filter(|segment| !segment.is_empty()).collect(),
		}
	}

	/// Returns a low-cardinality label for spans and metrics.
	pub const fn label(&self) -> &'static str {
		match self {
			Resource::Token => "Token",
			Resource::StateSystem => "StateSystem",
			Resource::Command => "Command",
			Resource::CommandStatus(_) => "CommandStatus",
			Resource::Custom(_) => "Custom",
		}
	}
}
impl Display for Resource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.segments().join("/"))
	}
}
impl From<&str> for Resource {
	fn from(path: &str) -> Self {
		match path.trim_matches('/') {
			"Token" => Resource::Token,
			"StateSystem" => Resource::StateSystem,
			"Command" => Resource::Command,
			other => Resource::Custom(other.to_owned()),
		}
	}
}

/// How a request authenticates beyond its signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Authentication {
	/// Carries the current bearer token; `401`/`403` trigger one refresh and retry.
	Token,
	/// Carries only `app_id` + `nonce`; `401`/`403` are terminal auth failures.
	AppOnly,
}

/// One logical request: verb, resource, and caller parameters.
///
/// The engine stamps `app_id`, a fresh `nonce`, and (for [`Authentication::Token`]) the current
/// `token` into the parameters on every attempt, so a retried envelope always carries fresh
/// values.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestEnvelope {
	/// HTTP verb.
	pub method: Method,
	/// Target resource.
	pub resource: Resource,
	/// Caller-supplied parameters.
	pub params: RequestParams,
	/// Authentication mode.
	pub auth: Authentication,
}
impl RequestEnvelope {
	/// Creates a token-authenticated envelope.
	pub fn new(method: Method, resource: impl Into<Resource>, params: RequestParams) -> Self {
		Self { method, resource: resource.into(), params, auth: Authentication::Token }
	}

	/// Switches the envelope to [`Authentication::AppOnly`].
	pub fn app_only(mut self) -> Self {
		self.auth = Authentication::AppOnly;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resources_render_paths_and_labels() {
		let id = CommandId::new("c-1").expect("Command fixture should be valid.");

		assert_eq!(Resource::CommandStatus(id).to_string(), "Command/c-1");
		assert_eq!(Resource::from("/StateSystem/"), Resource::StateSystem);
		assert_eq!(Resource::from("Reports//Daily").segments(), vec!["Reports", "Daily"]);
		assert_eq!(Resource::from("Reports/Daily").label(), "Custom");
	}
}
