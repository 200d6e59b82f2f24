//! Parameter shapes for the `Command` resource.

// self
use crate::{_prelude::*, error::ConfigError, params::RequestParams};

/// Author recorded on shift commands when the caller does not name one.
pub const DEFAULT_AUTHOR: &str = "name";

/// Command kinds accepted by `POST Command`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandType {
	/// Opens a register shift.
	OpenShift,
	/// Closes the current register shift.
	CloseShift,
	/// Prints a sale receipt.
	PrintCheck,
	/// Prints a purchase-return receipt.
	PrintPurchaseReturn,
}
impl CommandType {
	/// Returns the wire value of the `type` parameter.
	pub const fn as_str(self) -> &'static str {
		match self {
			CommandType::OpenShift => "openShift",
			CommandType::CloseShift => "closeShift",
			CommandType::PrintCheck => "printCheck",
			CommandType::PrintPurchaseReturn => "printPurchaseReturn",
		}
	}
}
impl Display for CommandType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Body of the shift commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShiftCommand<'a> {
	/// Always the string `"false"`; the service expects it verbatim.
	pub report_type: &'static str,
	/// Name recorded as the shift author.
	pub author: &'a str,
}
impl<'a> ShiftCommand<'a> {
	/// Creates a shift body, falling back to [`DEFAULT_AUTHOR`].
	pub fn new(author: Option<&'a str>) -> Self {
		Self { report_type: "false", author: author.unwrap_or(DEFAULT_AUTHOR) }
	}
}

/// Builds `{command, type}` parameters for one command submission.
pub fn command_params<T>(kind: CommandType, command: &T) -> Result<RequestParams, ConfigError>
where
	T: ?Sized + Serialize,
{
	Ok(RequestParams::new().with("command", serde_json::to_value(command)?).with("type", kind.as_str()))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn command_types_render_wire_names() {
		let params = command_params(CommandType::PrintPurchaseReturn, &json!({ "c_num": 1 }))
			.expect("Receipt params should build.");

		assert_eq!(
			params.encode().expect("Receipt params should encode.").to_string(),
			r#"{"command":{"c_num":1},"type":"printPurchaseReturn"}"#
		);
		assert_eq!(CommandType::OpenShift.to_string(), "openShift");
	}

	#[test]
	fn shift_commands_default_the_author() {
		let params = command_params(CommandType::CloseShift, &ShiftCommand::new(None))
			.expect("Shift params should build.");

		assert_eq!(
			params.encode().expect("Shift params should encode.").to_string(),
			r#"{"command":{"report_type":"false","author":"name"},"type":"closeShift"}"#
		);

		let named = ShiftCommand::new(Some("Иванов"));

		assert_eq!(named.author, "Иванов");
	}
}
