//! Strongly typed identifiers enforced across the client domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (app, command).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (app, command).
		kind: &'static str,
	},
	/// The identifier contains a path separator.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSeparator {
		/// Kind of identifier (app, command).
		kind: &'static str,
	},
	/// The identifier is a relative path segment (`.` or `..`).
	#[error("{kind} identifier cannot be a relative path segment.")]
	DotSegment {
		/// Kind of identifier (app, command).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (app, command).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AppId, "Integration `app_id` issued by the remote service.", "App" }
def_id! { CommandId, "Identifier the remote service assigns to a submitted command.", "Command" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains(['/', '\\']) {
		return Err(IdentifierError::ContainsSeparator { kind });
	}
	if matches!(view, "." | "..") {
		return Err(IdentifierError::DotSegment { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_separators() {
		assert!(AppId::new(" app-1").is_err(), "Leading whitespace must be rejected.");
		assert!(AppId::new("app-1 ").is_err(), "Trailing whitespace must be rejected.");
		assert!(CommandId::new("").is_err());
		assert!(CommandId::new("../Token").is_err());
		assert_eq!(CommandId::new(".."), Err(IdentifierError::DotSegment { kind: "Command" }));
		assert!(CommandId::new(".").is_err());
		assert!(CommandId::new("c.1").is_ok());

		let app = AppId::new("a1b2c3").expect("App fixture should be considered valid.");

		assert_eq!(app.as_ref(), "a1b2c3");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: CommandId =
			serde_json::from_str("\"cmd-42\"").expect("Command identifier should deserialize.");

		assert_eq!(id.as_ref(), "cmd-42");
		assert!(serde_json::from_str::<CommandId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		AppId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(AppId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}
