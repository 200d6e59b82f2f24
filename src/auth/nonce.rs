//! Time-derived, single-use request nonces.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

static LAST_MICROS: AtomicU64 = AtomicU64::new(0);

/// Single-use request identifier of the form `nonce_<seconds><microseconds>`.
///
/// Values are strictly increasing within a process, so two requests issued in the same
/// microsecond still receive distinct nonces.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(String);
impl Nonce {
	const PREFIX: &'static str = "nonce_";

	/// Generates a fresh nonce from the current UTC clock.
	pub fn generate() -> Self {
		Self::from_micros(Self::next_micros(OffsetDateTime::now_utc()))
	}

	/// Returns the nonce as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	fn from_micros(micros: u64) -> Self {
		// Same digits as a fractional timestamp with the dot removed.
		Self(format!("{}{}{:06}", Self::PREFIX, micros / 1_000_000, micros % 1_000_000))
	}

	fn next_micros(now: OffsetDateTime) -> u64 {
		let observed = u64::try_from(now.unix_timestamp_nanos() / 1_000).unwrap_or_default();
		let previous = LAST_MICROS
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
				Some(observed.max(last.saturating_add(1)))
			})
			.unwrap_or(observed);

		observed.max(previous.saturating_add(1))
	}
}
impl AsRef<str> for Nonce {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Nonce({})", self.0)
	}
}
impl Display for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn nonce_strips_fraction_separator() {
		let nonce = Nonce::from_micros(1_700_000_000_000_042);

		assert_eq!(nonce.as_str(), "nonce_1700000000000042");
		assert!(!nonce.as_str().contains('.'));
	}

	#[test]
	fn generated_nonces_never_repeat() {
		let nonces = (0..1_000).map(|_| Nonce::generate()).collect::<HashSet<_>>();

		assert_eq!(nonces.len(), 1_000);
	}
}
