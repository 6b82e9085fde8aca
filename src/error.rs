//! Gate-level error types shared across the authentication flow and the API client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gate error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; the caller may retry the request.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The user or the provider rejected the authorization request.
	#[error("Provider denied the authorization request: {}.", .description.as_deref().unwrap_or(.name.as_str()))]
	ProviderDenied {
		/// Error type reported by the provider (the `error` query value, verbatim).
		name: String,
		/// Machine reason code (the `error_reason` query value), when present.
		reason: Option<String>,
		/// Human-readable description (the `error_description` query value,
		/// percent-decoded), when present.
		description: Option<String>,
	},
	/// The code-for-token exchange did not succeed.
	#[error("{message}.")]
	TokenExchange {
		/// Human-readable summary of the failure.
		message: String,
		/// Generic classification tag; the provider's error detail is not parsed.
		kind: &'static str,
	},
	/// The request carries no session handle, which the authorization-code round trip
	/// requires.
	#[error("Request has no session support; the authorization-code flow cannot proceed.")]
	SessionUnavailable,
}

/// Configuration and validation failures raised before any request is processed.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// `app_id` was missing or empty.
	#[error("No app_id specified.")]
	MissingAppId,
	/// `app_secret` was missing or empty.
	#[error("No app_secret specified.")]
	MissingAppSecret,
	/// `redirect_uri` was missing or empty.
	#[error("No redirect_uri specified.")]
	MissingRedirectUri,
	/// `redirect_uri` could not be parsed as a URL.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider endpoint validation failed.
	#[error(transparent)]
	Endpoints(#[from] crate::provider::ProviderEndpointsError),
	/// Configured scope list is invalid.
	#[error("Configured scope list is invalid.")]
	InvalidScope(#[from] crate::auth::ScopeError),
	/// A resource path produced an unparseable request URL.
	#[error("Resource path produces an invalid URL.")]
	InvalidResourcePath {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Temporary failure variants (safe for the caller to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// The outbound call exceeded the configured deadline.
	#[error("Request to the {stage} endpoint timed out.")]
	Timeout {
		/// Which outbound call timed out.
		stage: &'static str,
	},
	/// The API responded with malformed JSON that could not be parsed.
	#[error("API response contained malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
