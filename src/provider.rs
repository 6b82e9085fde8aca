//! Provider endpoint set consumed by the gate and the API client.
//!
//! Defaults target the provider's public hosts (Facebook's classic dialog, Graph, and
//! FQL endpoints); every endpoint can be overridden for tests or gateway deployments.
//! Endpoints are validated to be HTTPS at build time.

// self
use crate::_prelude::*;

const DEFAULT_DIALOG: &str = "https://www.facebook.com/dialog/oauth";
const DEFAULT_TOKEN: &str = "https://graph.facebook.com/oauth/access_token";
const DEFAULT_GRAPH: &str = "https://graph.facebook.com";
const DEFAULT_QUERY: &str = "https://api.facebook.com/method/fql.query";

/// Errors raised while constructing or validating provider endpoints.
#[derive(Debug, ThisError)]
pub enum ProviderEndpointsError {
	/// An endpoint URL could not be parsed.
	#[error("The {endpoint} endpoint URL is invalid.")]
	Invalid {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	Insecure {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Validated endpoint set declared for the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization dialog users are redirected to.
	pub dialog: Url,
	/// Token endpoint used for the code-for-token exchange.
	pub token: Url,
	/// Base URL of the resource (Graph) API.
	pub graph: Url,
	/// Query-language (FQL) endpoint.
	pub query: Url,
}
impl ProviderEndpoints {
	/// Creates a new builder seeded with the provider defaults.
	pub fn builder() -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::default()
	}

	/// Validates invariants for the endpoint set.
	fn validate(&self) -> Result<(), ProviderEndpointsError> {
		validate_endpoint("dialog", &self.dialog)?;
		validate_endpoint("token", &self.token)?;
		validate_endpoint("graph", &self.graph)?;
		validate_endpoint("query", &self.query)?;

		Ok(())
	}
}

/// Builder for [`ProviderEndpoints`] values; unset endpoints fall back to the
/// provider defaults.
#[derive(Debug, Default)]
pub struct ProviderEndpointsBuilder {
	/// Optional authorization dialog override.
	pub dialog: Option<Url>,
	/// Optional token endpoint override.
	pub token: Option<Url>,
	/// Optional resource API base override.
	pub graph: Option<Url>,
	/// Optional query-language endpoint override.
	pub query: Option<Url>,
}
impl ProviderEndpointsBuilder {
	/// Overrides the authorization dialog.
	pub fn dialog(mut self, url: Url) -> Self {
		self.dialog = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token(mut self, url: Url) -> Self {
		self.token = Some(url);

		self
	}

	/// Overrides the resource API base.
	pub fn graph(mut self, url: Url) -> Self {
		self.graph = Some(url);

		self
	}

	/// Overrides the query-language endpoint.
	pub fn query(mut self, url: Url) -> Self {
		self.query = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoint set.
	pub fn build(self) -> Result<ProviderEndpoints, ProviderEndpointsError> {
		let endpoints = ProviderEndpoints {
			dialog: resolve("dialog", self.dialog, DEFAULT_DIALOG)?,
			token: resolve("token", self.token, DEFAULT_TOKEN)?,
			graph: resolve("graph", self.graph, DEFAULT_GRAPH)?,
			query: resolve("query", self.query, DEFAULT_QUERY)?,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}
}

fn resolve(
	name: &'static str,
	supplied: Option<Url>,
	default: &str,
) -> Result<Url, ProviderEndpointsError> {
	match supplied {
		Some(url) => Ok(url),
		None => Url::parse(default)
			.map_err(|source| ProviderEndpointsError::Invalid { endpoint: name, source }),
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderEndpointsError> {
	if url.scheme() != "https" {
		Err(ProviderEndpointsError::Insecure { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}
