//! Inbound request abstraction consumed by the authentication gate.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, session::SessionStore};

/// One inbound request as the gate sees it: query parameters, an optional parsed body,
/// an optional cookie set, and the caller's session handle.
///
/// Query parameters are derived lazily from the raw request target the first time they
/// are read; hosts that already parsed them can inject the map with
/// [`with_query`](Self::with_query) instead.
pub struct RequestContext {
	target: String,
	query: Option<HashMap<String, String>>,
	body: HashMap<String, String>,
	cookies: HashMap<String, String>,
	session: Option<Arc<dyn SessionStore>>,
}
impl RequestContext {
	/// Creates a context from the raw request target (path plus query string).
	pub fn new(target: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			query: None,
			body: HashMap::new(),
			cookies: HashMap::new(),
			session: None,
		}
	}

	/// Injects an already-parsed query map, skipping lazy derivation.
	pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
		self.query = Some(query);

		self
	}

	/// Adds a parsed body field (e.g. a posted `signed_request`).
	pub fn with_body_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.body.insert(name.into(), value.into());

		self
	}

	/// Adds a cookie.
	pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.insert(name.into(), value.into());

		self
	}

	/// Attaches the caller's session handle.
	pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
		self.session = Some(session);

		self
	}

	/// Returns a query parameter, parsing the raw target on first access.
	pub fn query_param(&mut self, name: &str) -> Option<&str> {
		self.ensure_query();

		self.query.as_ref().and_then(|map| map.get(name)).map(String::as_str)
	}

	/// Returns a parsed body field.
	pub fn body_field(&self, name: &str) -> Option<&str> {
		self.body.get(name).map(String::as_str)
	}

	/// Returns a cookie value.
	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.cookies.get(name).map(String::as_str)
	}

	/// Returns the caller's session handle, when the host provides one.
	pub fn session(&self) -> Option<&Arc<dyn SessionStore>> {
		self.session.as_ref()
	}

	fn ensure_query(&mut self) {
		if self.query.is_some() {
			return;
		}

		let raw = self.target.split_once('?').map(|(_, query)| query).unwrap_or("");

		self.query = Some(form_urlencoded::parse(raw.as_bytes()).into_owned().collect());
	}
}
impl Debug for RequestContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestContext")
			.field("target", &self.target)
			.field("query", &self.query)
			.field("body_fields", &self.body.len())
			.field("cookies", &self.cookies.len())
			.field("session_present", &self.session.is_some())
			.finish()
	}
}
