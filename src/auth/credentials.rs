//! Integration credentials and their validating builder.

// self
use crate::{
	_prelude::*,
	auth::{AppId, AppSecret, IdentifierError},
};

/// Errors raised while constructing or validating [`Credentials`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// Account URL is required.
	#[error("Missing account URL.")]
	MissingAccount,
	/// Account URL cannot be parsed.
	#[error("Account URL is invalid.")]
	InvalidAccount {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Account URL must use HTTPS unless it points at a loopback host.
	#[error("The account URL must use HTTPS: {url}.")]
	InsecureAccount {
		/// Account URL that failed validation.
		url: String,
	},
	/// Account URL cannot carry resource paths beneath it.
	#[error("The account URL cannot be used as a base: {url}.")]
	NotABase {
		/// Account URL that failed validation.
		url: String,
	},
	/// Account URL carries a query string or fragment.
	#[error("The account URL must not carry a query or fragment: {url}.")]
	UnexpectedQuery {
		/// Account URL that failed validation.
		url: String,
	},
	/// Integration identifier is required.
	#[error("Missing app_id.")]
	MissingAppId,
	/// Integration identifier failed validation.
	#[error(transparent)]
	InvalidAppId(#[from] IdentifierError),
	/// Signing secret is required and must not be empty.
	#[error("Missing or empty signing secret.")]
	MissingSecret,
}

/// Immutable identity of one integration against one account.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Account base URL; resources are appended beneath it as path segments.
	pub account: Url,
	/// Integration identifier sent as `app_id`.
	pub app_id: AppId,
	/// Shared secret mixed into every request signature.
	pub secret: AppSecret,
}
impl Credentials {
	/// Returns a builder for validated credentials.
	pub fn builder() -> CredentialsBuilder {
		CredentialsBuilder::default()
	}
}

/// Builder for [`Credentials`].
#[derive(Debug, Default)]
pub struct CredentialsBuilder {
	account: Option<String>,
	app_id: Option<String>,
	secret: Option<AppSecret>,
}
impl CredentialsBuilder {
	/// Sets the account base URL (for example `https://check.example.com/open-api/v1/`).
	pub fn account(mut self, url: impl Into<String>) -> Self {
		self.account = Some(url.into());

		self
	}

	/// Sets the integration `app_id`.
	pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Sets the shared signing secret.
	pub fn secret(mut self, secret: impl Into<String>) -> Self {
		self.secret = Some(AppSecret::new(secret));

		self
	}

	/// Consumes the builder and validates the resulting credentials.
	pub fn build(self) -> Result<Credentials, CredentialsError> {
		let raw = self.account.ok_or(CredentialsError::MissingAccount)?;
		let account =
			Url::parse(raw.trim()).map_err(|source| CredentialsError::InvalidAccount { source })?;

		validate_account(&account)?;

		let app_id = AppId::new(self.app_id.ok_or(CredentialsError::MissingAppId)?)?;
		let secret = self
			.secret
			.filter(|secret| !secret.expose().is_empty())
			.ok_or(CredentialsError::MissingSecret)?;

		Ok(Credentials { account, app_id, secret })
	}
}

fn validate_account(url: &Url) -> Result<(), CredentialsError> {
	if url.cannot_be_a_base() {
		return Err(CredentialsError::NotABase { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(CredentialsError::UnexpectedQuery { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(CredentialsError::InsecureAccount { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder(account: &str) -> CredentialsBuilder {
		Credentials::builder().account(account).app_id("app-1").secret("secret-1")
	}

	#[test]
	fn builds_valid_credentials() {
		let credentials = builder("https://check.example.com/open-api/v1/")
			.build()
			.expect("HTTPS account should be accepted.");

		assert_eq!(credentials.account.as_str(), "https://check.example.com/open-api/v1/");
		assert_eq!(credentials.app_id.as_ref(), "app-1");
		assert_eq!(credentials.secret.expose(), "secret-1");
	}

	#[test]
	fn rejects_insecure_non_loopback_accounts() {
		let err = builder("http://check.example.com/").build().expect_err("Plain HTTP must fail.");

		assert!(matches!(err, CredentialsError::InsecureAccount { .. }));

		builder("http://127.0.0.1:8080/").build().expect("Loopback HTTP should be accepted.");
		builder("http://localhost/api/").build().expect("Localhost HTTP should be accepted.");
	}

	#[test]
	fn rejects_missing_and_malformed_fields() {
		assert_eq!(
			Credentials::builder().app_id("a").secret("s").build().unwrap_err(),
			CredentialsError::MissingAccount,
		);
		assert!(matches!(
			builder("not a url").build(),
			Err(CredentialsError::InvalidAccount { .. })
		));
		assert!(matches!(
			builder("https://check.example.com/?a=1").build(),
			Err(CredentialsError::UnexpectedQuery { .. })
		));
		assert!(matches!(
			builder("https://check.example.com/").secret("").build(),
			Err(CredentialsError::MissingSecret)
		));
		assert!(matches!(
			builder("https://check.example.com/").app_id("with space").build(),
			Err(CredentialsError::InvalidAppId(_))
		));
	}
}
