//! Redacted wrappers for the shared signing secret and the bearer token.

// self
use crate::_prelude::*;

/// Shared secret used to sign requests; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);
impl AppSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AppSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AppSecret").field(&"<redacted>").finish()
	}
}

/// Bearer token issued by the `Token` resource.
///
/// Freshness is decided by the server alone: a token stays current until a request using it is
/// answered with `401` or `403`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token(String);
impl Token {
	/// Wraps a token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Token").field(&"<redacted>").finish()
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let token = Token::new("super-secret");
		let secret = AppSecret::new("signing-secret");

		assert_eq!(format!("{token:?}"), "Token(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(format!("{secret:?}"), "AppSecret(\"<redacted>\")");
		assert_eq!(token.expose(), "super-secret");
	}
}
