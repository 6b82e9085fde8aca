//! Rust’s lightweight OAuth 2.0 request gate—verify signed requests, guard the
//! authorization-code handshake, and query the provider’s Graph and FQL surfaces with one
//! access token.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod provider;
pub mod request;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	use hmac::{Hmac, Mac};
	use sha2::Sha256;
	// self
	use crate::{
		config::GateConfig, gate::AuthGate, http::GateHttpClient, provider::ProviderEndpoints,
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_http_client() -> GateHttpClient {
		test_http_client_with_timeout(Duration::from_secs(5))
	}

	/// Same as [`test_http_client`] with an explicit request deadline, for timeout tests.
	pub fn test_http_client_with_timeout(timeout: Duration) -> GateHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(timeout)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		GateHttpClient::with_client(client)
	}

	/// Builds a provider endpoint set that lives entirely under the mock server at `base`.
	pub fn test_endpoints(base: &str) -> ProviderEndpoints {
		ProviderEndpoints::builder()
			.dialog(parse_test_url(&format!("{base}/dialog/oauth")))
			.token(parse_test_url(&format!("{base}/oauth/access_token")))
			.graph(parse_test_url(base))
			.query(parse_test_url(&format!("{base}/method/fql.query")))
			.build()
			.expect("Mock endpoints should pass validation.")
	}

	/// Gate configuration used across integration tests.
	pub fn test_config(base: &str) -> GateConfig {
		GateConfig::builder()
			.app_id("123")
			.app_secret("s3cr3t")
			.redirect_uri("https://app.example.com/cb")
			.endpoints(test_endpoints(base))
			.build()
			.expect("Test configuration should pass validation.")
	}

	/// Constructs an [`AuthGate`] wired to the mock server at `base` and the insecure
	/// transport used across integration tests.
	pub fn build_test_gate(base: &str) -> AuthGate {
		AuthGate::with_http_client(test_config(base), test_http_client())
	}

	/// Produces a `signature.payload` string accepted by the signed-payload verifier.
	pub fn sign_test_payload(algorithm: &str, oauth_token: Option<&str>, secret: &str) -> String {
		let body = match oauth_token {
			Some(token) => format!("{{\"algorithm\":\"{algorithm}\",\"oauth_token\":\"{token}\"}}"),
			None => format!("{{\"algorithm\":\"{algorithm}\"}}"),
		};
		let encoded = URL_SAFE_NO_PAD.encode(body.as_bytes());
		let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
			.expect("HMAC should accept keys of any length.");

		mac.update(encoded.as_bytes());

		format!("{}.{encoded}", URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
	}

	fn parse_test_url(raw: &str) -> Url {
		Url::parse(raw).expect("Test URL should parse successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, oauth2_gate as _, tokio as _};
