//! Typed request parameters and the canonical JSON encoder shared by signing and dispatch.
//!
//! The same [`CanonicalJson`] bytes feed the `sign` header and, for `POST` requests, the request
//! body, so the signed bytes and the sent bytes cannot diverge.

// std
use std::io;
// crates.io
use serde_json::ser::{Formatter as JsonFormatter, Serializer};
// self
use crate::{_prelude::*, error::ConfigError};

/// Key-ordered parameter map for one logical request.
///
/// Top-level keys are kept sorted; nested objects keep the order they were built with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestParams(BTreeMap<String, Value>);
impl RequestParams {
	/// Creates an empty parameter map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds parameters from any value that serializes into a JSON object.
	pub fn from_serialize<T>(value: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		match serde_json::to_value(value)? {
			Value::Object(map) => Ok(Self(map.into_iter().collect())),
			_ => Err(ConfigError::NotAnObject),
		}
	}

	/// Adds or replaces a parameter, returning the map for chaining.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);

		self
	}

	/// Adds or replaces a parameter.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	/// Removes a parameter.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.0.remove(key)
	}

	/// Returns a parameter by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns `true` when no parameters are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates parameters in ascending key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Encodes the parameters into their canonical JSON form.
	pub fn encode(&self) -> Result<CanonicalJson, ConfigError> {
		let mut buf = Vec::with_capacity(128);
		let mut serializer = Serializer::with_formatter(&mut buf, CanonicalFormatter);

		self.0.serialize(&mut serializer)?;

		Ok(CanonicalJson(buf))
	}

	/// Renders the parameters as they travel in a query string.
	///
	/// Strings pass through untouched, `null` values are dropped, and every other value is
	/// rendered as canonical JSON text.
	pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
		let mut pairs = Vec::with_capacity(self.0.len());

		for (key, value) in &self.0 {
			let rendered = match value {
				Value::Null => continue,
				Value::String(text) => text.clone(),
				other => {
					let mut buf = Vec::new();

					other.serialize(&mut Serializer::with_formatter(&mut buf, CanonicalFormatter))?;

					String::from_utf8_lossy(&buf).into_owned()
				},
			};

			pairs.push((key.clone(), rendered));
		}

		Ok(pairs)
	}

	/// Returns the string-valued map the server reconstructs from a query string.
	pub fn as_transmitted_query(&self) -> Result<Self, ConfigError> {
		Ok(Self(
			self.to_query_pairs()?.into_iter().map(|(key, value)| (key, Value::String(value))).collect(),
		))
	}
}
impl<K, V> FromIterator<(K, V)> for RequestParams
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}

/// Canonical JSON bytes: compact, top-level keys sorted, non-ASCII left unescaped, `/` escaped
/// as `\/` to match the server's canonical form.
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalJson(Vec<u8>);
impl CanonicalJson {
	/// Returns the encoded bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the payload, returning the encoded bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}
impl Debug for CanonicalJson {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CanonicalJson").field(&String::from_utf8_lossy(&self.0)).finish()
	}
}
impl Display for CanonicalJson {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&String::from_utf8_lossy(&self.0))
	}
}

struct CanonicalFormatter;
impl JsonFormatter for CanonicalFormatter {
	fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		let mut parts = fragment.split('/');

		if let Some(first) = parts.next() {
			writer.write_all(first.as_bytes())?;
		}
		for part in parts {
			writer.write_all(b"\\/")?;
			writer.write_all(part.as_bytes())?;
		}

		Ok(())
	}
}
