//! Anti-forgery state nonce for the authorization-code round trip.

// crates.io
use rand::{Rng, distr::Alphanumeric};

const STATE_LEN: usize = 32;

/// Single-use anti-forgery nonce tied to one authorization round trip.
///
/// Created when the user is sent to the provider dialog, persisted in the caller's
/// session, and consumed on the first callback comparison. Equality with the callback's
/// `state` parameter is an exact string match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfState(String);
impl CsrfState {
	/// Generates a fresh high-entropy nonce from the thread-local CSPRNG.
	pub fn generate() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect())
	}

	/// Wraps a nonce previously persisted in the caller's session.
	pub fn from_stored(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Exact comparison against the `state` value a callback carried.
	pub fn matches(&self, returned_state: &str) -> bool {
		self.0 == returned_state
	}

	/// Returns the nonce value for session storage and URL construction.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
