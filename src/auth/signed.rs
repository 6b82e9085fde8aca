//! Signed-request payload decoding and HMAC-SHA256 verification.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::AppSecret};

type HmacSha256 = Hmac<Sha256>;

const SUPPORTED_ALGORITHM: &str = "HMAC-SHA256";

/// Decoded signed-request payload asserting an identity without a redirect round trip.
///
/// Lives for the duration of one request only; the gate never persists it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedPayload {
	/// Signature algorithm declared by the payload; only `HMAC-SHA256` is accepted.
	pub algorithm: String,
	/// Embedded access token, present once the user has authorized the application.
	#[serde(default)]
	pub oauth_token: Option<String>,
	/// Provider-side user identifier.
	#[serde(default)]
	pub user_id: Option<String>,
	/// Authorization code embedded by cookie-based flows.
	#[serde(default)]
	pub code: Option<String>,
	/// Unix timestamp at which the payload was issued.
	#[serde(default)]
	pub issued_at: Option<i64>,
	/// Unix timestamp at which the embedded token expires.
	#[serde(default)]
	pub expires: Option<i64>,
	/// Remaining provider-defined fields, preserved verbatim.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl SignedPayload {
	/// Decodes and verifies a two-segment `signature.payload` string.
	///
	/// Verification is all-or-nothing: any decoding, parsing, algorithm, or signature
	/// failure returns `None` (with a diagnostic event) and never escalates past this
	/// boundary.
	pub fn verify(raw: &str, secret: &AppSecret) -> Option<Self> {
		let Some((signature, body)) = raw.split_once('.') else {
			tracing::debug!("Signed payload is not a two-segment string.");

			return None;
		};
		let decoded = decode_segment(body)?;
		let payload = match serde_json::from_slice::<Self>(&decoded) {
			Ok(payload) => payload,
			Err(e) => {
				tracing::debug!(error = %e, "Signed payload body is not valid JSON.");

				return None;
			},
		};

		if !payload.algorithm.eq_ignore_ascii_case(SUPPORTED_ALGORITHM) {
			tracing::debug!(algorithm = %payload.algorithm, "Unknown signed payload algorithm.");

			return None;
		}
		if sign_segment(body, secret)? != signature {
			tracing::debug!("Signed payload signature mismatch.");

			return None;
		}

		Some(payload)
	}
}

/// Decodes a base64 body segment, tolerating both the url-safe and the standard
/// alphabet as well as stray padding.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
	let normalized = segment
		.chars()
		.filter(|c| *c != '=')
		.map(|c| match c {
			'-' => '+',
			'_' => '/',
			other => other,
		})
		.collect::<String>();

	match STANDARD_NO_PAD.decode(normalized.as_bytes()) {
		Ok(bytes) => Some(bytes),
		Err(e) => {
			tracing::debug!(error = %e, "Signed payload body is not valid base64.");

			None
		},
	}
}

/// Recomputes the expected signature over the raw (pre-decoding) body segment and
/// renders it in the url-safe, unpadded form the provider emits.
fn sign_segment(segment: &str, secret: &AppSecret) -> Option<String> {
	let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes()).ok()?;

	mac.update(segment.as_bytes());

	Some(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}
