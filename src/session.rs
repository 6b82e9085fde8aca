//! Session contracts and the built-in in-memory implementation.

// self
use crate::_prelude::*;

/// String-keyed session storage injected by the hosting pipeline.
///
/// The gate only reads and writes its own nonce key. Each session handle belongs to
/// exactly one in-flight caller in the intended usage model, so implementations need
/// interior mutability but no cross-request coordination.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if present.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`, replacing any previous value.
	fn insert(&self, key: &str, value: String);

	/// Removes and returns the value stored under `key`.
	fn remove(&self, key: &str) -> Option<String>;
}

type SessionMap = Arc<RwLock<HashMap<String, String>>>;

/// Thread-safe in-memory session for tests, demos, and single-process hosts.
///
/// Clones share the same underlying map, so a host can keep one handle while the gate
/// writes through another.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(SessionMap);
impl SessionStore for MemorySession {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn insert(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}

	fn remove(&self, key: &str) -> Option<String> {
		self.0.write().remove(key)
	}
}
