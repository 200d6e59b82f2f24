//! Request signatures: MD5 over canonical parameters followed by the shared secret.

// crates.io
use md5::{Digest, Md5};
// self
use crate::{
	_prelude::*,
	auth::AppSecret,
	error::ConfigError,
	params::{CanonicalJson, RequestParams},
};

/// Name of the header carrying the request signature.
pub const SIGN_HEADER: &str = "sign";

/// Lowercase hex-encoded 128-bit request signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(String);
impl Signature {
	/// Returns the hex digest.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Deterministic signer bound to one integration secret.
#[derive(Clone, Debug)]
pub struct Signer {
	secret: AppSecret,
}
impl Signer {
	/// Creates a signer for the provided secret.
	pub fn new(secret: AppSecret) -> Self {
		Self { secret }
	}

	/// Signs an already-encoded payload.
	pub fn sign(&self, payload: &CanonicalJson) -> Signature {
		let mut hasher = Md5::new();

		hasher.update(payload.as_bytes());
		hasher.update(self.secret.expose().as_bytes());

		Signature(hex::encode(hasher.finalize()))
	}

	/// Encodes `params` canonically and signs the result.
	pub fn sign_params(&self, params: &RequestParams) -> Result<Signature, ConfigError> {
		Ok(self.sign(&params.encode()?))
	}
}
