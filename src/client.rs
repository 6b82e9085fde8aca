//! Authenticated API client bound to one access token.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::ConfigError,
	http::GateHttpClient,
	provider::ProviderEndpoints,
};

/// Authenticated client exposing the provider's two query surfaces over one token.
///
/// Lifetime is one authenticated request context: nothing is cached, refreshed, or
/// revoked. Both operations share one GET-and-parse primitive.
#[derive(Clone, Debug)]
pub struct ApiClient {
	token: AccessToken,
	endpoints: ProviderEndpoints,
	http: GateHttpClient,
}
impl ApiClient {
	/// Binds a client to the provided token, endpoint set, and transport.
	pub fn new(token: AccessToken, endpoints: ProviderEndpoints, http: GateHttpClient) -> Self {
		Self { token, endpoints, http }
	}

	/// Read access to the bound token.
	pub fn token(&self) -> &AccessToken {
		&self.token
	}

	/// Issues a resource (Graph) API query.
	///
	/// `path` may carry its own query string (`/me?fields=id`); the access token is
	/// appended as a query parameter either way. Malformed JSON in the response is a
	/// hard error surfaced to the caller.
	pub async fn query_resource(&self, path: &str) -> Result<serde_json::Value> {
		let url = self.resource_url(path)?;

		self.http.get_json(url, "resource").await
	}

	/// Issues a query-language (FQL) query with `format=json`.
	pub async fn query_language(&self, query: &str) -> Result<serde_json::Value> {
		let mut url = self.endpoints.query.clone();

		url.query_pairs_mut()
			.append_pair("query", query)
			.append_pair("format", "json")
			.append_pair("access_token", self.token.expose());

		self.http.get_json(url, "query").await
	}

	fn resource_url(&self, path: &str) -> Result<Url> {
		let base = self.endpoints.graph.as_str().trim_end_matches('/');
		let path_view = path.trim_start_matches('/');
		let separator = if path.contains('?') { '&' } else { '?' };
		let token_pair = form_urlencoded::Serializer::new(String::new())
			.append_pair("access_token", self.token.expose())
			.finish();

		Url::parse(&format!("{base}/{path_view}{separator}{token_pair}"))
			.map_err(|source| ConfigError::InvalidResourcePath { source }.into())
	}
}
