//! Gate configuration and its eager-validating builder.

// self
use crate::{
	_prelude::*,
	auth::{AppSecret, ScopeList},
	error::ConfigError,
	http::DEFAULT_TIMEOUT,
	provider::ProviderEndpoints,
};

/// Immutable configuration captured by the gate at construction time.
///
/// Built via [`GateConfig::builder`]; a missing `app_id`, `app_secret`, or
/// `redirect_uri` fails at build time, before any request is processed. There is no
/// process-global configuration: the gate captures this value by ownership.
#[derive(Clone, Debug)]
pub struct GateConfig {
	/// OAuth application identifier (`client_id`).
	pub app_id: String,
	/// Application secret; redacted in `Debug` output and never placed in user-facing
	/// URLs, logs, or response bodies.
	pub app_secret: AppSecret,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Permissions requested in the authorization dialog; defaults to none.
	pub scope: ScopeList,
	/// Provider endpoint set; defaults to the provider's public hosts.
	pub endpoints: ProviderEndpoints,
	/// Deadline applied to each outbound provider call.
	pub timeout: Duration,
}
impl GateConfig {
	/// Creates a new builder with defaults for scope, endpoints, and timeout.
	pub fn builder() -> GateConfigBuilder {
		GateConfigBuilder::default()
	}
}

/// Builder for [`GateConfig`] values.
#[derive(Debug, Default)]
pub struct GateConfigBuilder {
	app_id: Option<String>,
	app_secret: Option<AppSecret>,
	redirect_uri: Option<String>,
	scope: Option<ScopeList>,
	endpoints: Option<ProviderEndpoints>,
	timeout: Option<Duration>,
}
impl GateConfigBuilder {
	/// Sets the OAuth application identifier.
	pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Sets the application secret.
	pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
		self.app_secret = Some(AppSecret::new(app_secret));

		self
	}

	/// Sets the redirect URI registered with the provider.
	pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(redirect_uri.into());

		self
	}

	/// Sets the requested permission scope.
	pub fn scope(mut self, scope: ScopeList) -> Self {
		self.scope = Some(scope);

		self
	}

	/// Overrides the provider endpoint set.
	pub fn endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Overrides the outbound call deadline.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Consumes the builder, validating every required field eagerly.
	pub fn build(self) -> Result<GateConfig, ConfigError> {
		let app_id = self.app_id.filter(|id| !id.is_empty()).ok_or(ConfigError::MissingAppId)?;
		let app_secret =
			self.app_secret.filter(|s| !s.is_empty()).ok_or(ConfigError::MissingAppSecret)?;
		let redirect_uri = self
			.redirect_uri
			.filter(|uri| !uri.is_empty())
			.ok_or(ConfigError::MissingRedirectUri)?;
		let redirect_uri = Url::parse(&redirect_uri)
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let endpoints = match self.endpoints {
			Some(endpoints) => endpoints,
			None => ProviderEndpoints::builder().build()?,
		};

		Ok(GateConfig {
			app_id,
			app_secret,
			redirect_uri,
			scope: self.scope.unwrap_or_default(),
			endpoints,
			timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
		})
	}
}
