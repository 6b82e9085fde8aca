//! Thin HTTP transport shared by the token exchange and the API client.
//!
//! Wraps [`ReqwestClient`] so the bounded request deadline and the transport error
//! mapping live in one place. Every outbound provider call is a plain GET; responses
//! are read fully into memory before parsing.

// std
use std::ops::Deref;
// crates.io
use reqwest::StatusCode;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
};

/// Default deadline applied to every outbound provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around [`ReqwestClient`] with a bounded per-request deadline.
#[derive(Clone, Debug)]
pub struct GateHttpClient(ReqwestClient);
impl GateHttpClient {
	/// Builds a client enforcing the provided request deadline.
	pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing [`ReqwestClient`]; the caller owns its timeout policy.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Issues a GET and returns the status plus the full response body.
	pub(crate) async fn get_text(&self, url: Url, stage: &'static str) -> Result<(StatusCode, String)> {
		let response = self.0.get(url).send().await.map_err(|e| map_reqwest_error(e, stage))?;
		let status = response.status();
		let body = response.text().await.map_err(|e| map_reqwest_error(e, stage))?;

		Ok((status, body))
	}

	/// Issues a GET and parses the response body as JSON, regardless of HTTP status.
	pub(crate) async fn get_json(&self, url: Url, stage: &'static str) -> Result<serde_json::Value> {
		let (status, body) = self.get_text(url, stage).await?;
		let mut deserializer = serde_json::Deserializer::from_str(&body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ResponseParse { source, status: Some(status.as_u16()) }.into()
		})
	}
}
impl AsRef<ReqwestClient> for GateHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for GateHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

fn map_reqwest_error(e: ReqwestError, stage: &'static str) -> Error {
	if e.is_builder() {
		return ConfigError::http_client_build(e).into();
	}
	if e.is_timeout() {
		return TransientError::Timeout { stage }.into();
	}

	TransportError::from(e).into()
}
