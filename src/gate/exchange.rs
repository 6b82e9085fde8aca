//! Authorization-code-for-access-token exchange against the provider's legacy token
//! endpoint.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::AccessToken, config::GateConfig, http::GateHttpClient};

const EXCHANGE_FAILED: &str = "can't get access token";

/// Exchanges an authorization code for an access token.
///
/// A single attempt, bounded by the configured deadline. The endpoint is the provider's
/// legacy GET exchange whose success body is URL-query-encoded rather than JSON; the
/// client secret travels only inside this provider-bound request.
pub async fn exchange_code(
	http: &GateHttpClient,
	config: &GateConfig,
	code: &str,
) -> Result<AccessToken> {
	let mut url = config.endpoints.token.clone();

	url.query_pairs_mut()
		.append_pair("client_id", &config.app_id)
		.append_pair("redirect_uri", config.redirect_uri.as_str())
		.append_pair("client_secret", config.app_secret.expose())
		.append_pair("code", code);

	let (status, body) = http.get_text(url, "token").await?;

	if !status.is_success() {
		return Err(exchange_failed());
	}

	parse_token_response(&body).map(AccessToken::new).ok_or_else(exchange_failed)
}

/// Extracts the `access_token` field from a URL-query-encoded response body.
fn parse_token_response(body: &str) -> Option<String> {
	form_urlencoded::parse(body.as_bytes())
		.find(|(name, _)| name == "access_token")
		.map(|(_, value)| value.into_owned())
}

fn exchange_failed() -> Error {
	Error::TokenExchange { message: EXCHANGE_FAILED.into(), kind: "unknown" }
}
