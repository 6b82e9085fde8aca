//! Per-request authentication state machine.
//!
//! [`authenticate`] captures a validated [`GateConfig`] and returns the [`AuthGate`]
//! handler. Each call to [`AuthGate::handle`] evaluates one inbound request and ends in
//! exactly one terminal outcome: an authenticated API client, a challenge page that
//! redirects the user agent, or a propagated error.

pub mod exchange;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, CsrfState, SignedPayload},
	client::ApiClient,
	config::GateConfig,
	http::GateHttpClient,
	request::RequestContext,
	session::SessionStore,
};

/// Session key under which the gate persists the CSRF nonce across the redirect round
/// trip.
pub const STATE_SESSION_KEY: &str = "oauth2_gate.state";

/// Body field and cookie name carrying the provider's signed payload.
pub const SIGNED_REQUEST_FIELD: &str = "signed_request";

/// Builds the request handler for the provided configuration.
///
/// The configuration is captured by value; the gate holds no process-global state.
pub fn authenticate(config: GateConfig) -> Result<AuthGate> {
	AuthGate::new(config)
}

/// Terminal outcome of one evaluated request.
#[derive(Debug)]
pub enum GateOutcome {
	/// The user holds a verified credential. Ownership of the client transfers to the
	/// hosting pipeline, which continues to its next stage.
	Authenticated(ApiClient),
	/// The user agent must be sent elsewhere before the flow can continue.
	Challenge(RedirectPage),
}

/// Client-side redirect emitted for the dialog and restart states.
///
/// The body is a top-frame breakout script rather than an HTTP 3xx because the provider
/// disallows 3xx redirects inside iframed canvas pages. The gate sets no status code;
/// emitting the body is the host's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectPage {
	location: String,
}
impl RedirectPage {
	fn to(location: impl Into<String>) -> Self {
		Self { location: location.into() }
	}

	/// Destination the script sends the top frame to.
	pub fn location(&self) -> &str {
		&self.location
	}

	/// Renders the exact response body the hosting pipeline should emit.
	pub fn body(&self) -> String {
		format!("<script>top.location.href=\"{}\"</script>", self.location)
	}
}

/// Per-request authentication handler produced by [`authenticate`].
#[derive(Clone, Debug)]
pub struct AuthGate {
	config: GateConfig,
	http: GateHttpClient,
}
impl AuthGate {
	/// Creates a gate that provisions its own HTTP transport from the configured
	/// deadline.
	pub fn new(config: GateConfig) -> Result<Self> {
		let http = GateHttpClient::new(config.timeout)?;

		Ok(Self { config, http })
	}

	/// Creates a gate that reuses a caller-provided HTTP client.
	pub fn with_http_client(config: GateConfig, http: GateHttpClient) -> Self {
		Self { config, http }
	}

	/// Read access to the captured configuration.
	pub fn config(&self) -> &GateConfig {
		&self.config
	}

	/// Evaluates one inbound request.
	///
	/// States are checked in strict priority order: provider error, trusted signed
	/// payload, initial visit, verified callback, forged callback. At most one outbound
	/// network call (the code-for-token exchange) is issued per request.
	pub async fn handle(&self, ctx: &mut RequestContext) -> Result<GateOutcome> {
		// The provider reported an explicit error; surface it, do not redirect.
		if let Some(name) = ctx.query_param("error").map(str::to_owned) {
			let reason = ctx.query_param("error_reason").map(str::to_owned);
			let description = ctx.query_param("error_description").map(str::to_owned);

			return Err(Error::ProviderDenied { name, reason, description });
		}
		// A verified signed payload with an embedded token authenticates without any
		// network call.
		if let Some(client) = self.trusted_payload_client(ctx) {
			return Ok(GateOutcome::Authenticated(client));
		}

		let code = ctx.query_param("code").map(str::to_owned);
		let received_state = ctx.query_param("state").map(str::to_owned);
		// Session support is a hard precondition for the code round trip.
		let session = ctx.session().cloned().ok_or(Error::SessionUnavailable)?;

		match code {
			// Initial visit: issue a nonce and send the user to the dialog.
			None => Ok(GateOutcome::Challenge(self.challenge(session.as_ref()))),
			Some(code) => {
				// The stored nonce is consumed on every callback, match or not.
				let stored = session.remove(STATE_SESSION_KEY);
				let verified = match (stored, received_state) {
					(Some(stored), Some(received)) =>
						CsrfState::from_stored(stored).matches(&received),
					_ => false,
				};

				if verified {
					let token = exchange::exchange_code(&self.http, &self.config, &code).await?;

					Ok(GateOutcome::Authenticated(self.api_client(token)))
				} else {
					// Forgery suspected: restart the flow from a clean slate.
					tracing::warn!("Authorization state mismatch; restarting the flow.");

					Ok(GateOutcome::Challenge(RedirectPage::to(self.config.redirect_uri.as_str())))
				}
			},
		}
	}

	/// Looks for a signed payload in the posted body or the cookie set and, when it
	/// verifies and embeds a token, builds the client directly.
	///
	/// A payload that fails verification is treated as absent and the request falls
	/// through to the redirect/code flow.
	fn trusted_payload_client(&self, ctx: &RequestContext) -> Option<ApiClient> {
		let raw = ctx
			.body_field(SIGNED_REQUEST_FIELD)
			.or_else(|| ctx.cookie(SIGNED_REQUEST_FIELD))?
			.to_owned();
		let payload = SignedPayload::verify(&raw, &self.config.app_secret)?;

		match payload.oauth_token {
			Some(token) => Some(self.api_client(AccessToken::new(token))),
			None => {
				tracing::debug!("Verified signed payload carries no token; continuing the code flow.");

				None
			},
		}
	}

	fn challenge(&self, session: &dyn SessionStore) -> RedirectPage {
		let state = CsrfState::generate();

		session.insert(STATE_SESSION_KEY, state.as_str().to_owned());

		let mut dialog = self.config.endpoints.dialog.clone();

		dialog
			.query_pairs_mut()
			.append_pair("client_id", &self.config.app_id)
			.append_pair("redirect_uri", self.config.redirect_uri.as_str())
			.append_pair("scope", &self.config.scope.normalized())
			.append_pair("state", state.as_str());

		RedirectPage::to(dialog.as_str())
	}

	fn api_client(&self, token: AccessToken) -> ApiClient {
		ApiClient::new(token, self.config.endpoints.clone(), self.http.clone())
	}
}
