// crates.io
use httpmock::prelude::*;
// self
use oauth2_gate::{
	_preludet::*,
	error::{Error, TransientError},
	gate::{GateOutcome, STATE_SESSION_KEY},
	request::RequestContext,
	session::{MemorySession, SessionStore},
};

const APP_ID: &str = "123";
const APP_SECRET: &str = "s3cr3t";
const REDIRECT_URI: &str = "https://app.example.com/cb";

fn ctx_with(session: &MemorySession, target: &str) -> RequestContext {
	RequestContext::new(target).with_session(Arc::new(session.clone()))
}

#[tokio::test]
async fn provider_error_propagates_verbatim() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();
	let mut ctx = ctx_with(
		&session,
		"/cb?error=access_denied&error_reason=user_denied&error_description=Permission%20denied",
	);
	let err = gate.handle(&mut ctx).await.expect_err("Provider error should propagate.");

	match err {
		Error::ProviderDenied { name, reason, description } => {
			assert_eq!(name, "access_denied");
			assert_eq!(reason.as_deref(), Some("user_denied"));
			assert_eq!(description.as_deref(), Some("Permission denied"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn initial_visit_issues_a_nonce_and_the_dialog_redirect() {
	let server = MockServer::start_async().await;
	let base = server.url("");
	let gate = build_test_gate(&base);
	let session = MemorySession::default();
	let mut ctx = ctx_with(&session, "/cb");
	let outcome = gate.handle(&mut ctx).await.expect("Initial visit should yield a challenge.");
	let GateOutcome::Challenge(page) = outcome else {
		panic!("Initial visit should not authenticate.");
	};
	let state = session.get(STATE_SESSION_KEY).expect("A nonce should be stored in the session.");

	assert_eq!(state.len(), 32);

	let expected_url = format!(
		"{base}/dialog/oauth?client_id={APP_ID}&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb&scope=&state={state}"
	);

	assert_eq!(page.location(), expected_url);
	assert_eq!(page.body(), format!("<script>top.location.href=\"{expected_url}\"</script>"));
}

#[tokio::test]
async fn consecutive_visits_store_distinct_nonces() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();
	let mut first = ctx_with(&session, "/cb");
	let _ = gate.handle(&mut first).await.expect("First visit should yield a challenge.");
	let state_a = session.get(STATE_SESSION_KEY).expect("First nonce should be stored.");
	let mut second = ctx_with(&session, "/cb");
	let _ = gate.handle(&mut second).await.expect("Second visit should yield a challenge.");
	let state_b = session.get(STATE_SESSION_KEY).expect("Second nonce should be stored.");

	assert!(!state_a.is_empty());
	assert!(!state_b.is_empty());
	assert_ne!(state_a, state_b);
}

#[tokio::test]
async fn verified_callback_exchanges_the_code_and_attaches_a_client() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "expected-state".into());

	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth/access_token")
				.query_param("client_id", APP_ID)
				.query_param("redirect_uri", REDIRECT_URI)
				.query_param("client_secret", APP_SECRET)
				.query_param("code", "abc");
			then.status(200).body("access_token=TOK123&expires=99");
		})
		.await;
	let mut ctx = ctx_with(&session, "/cb?code=abc&state=expected-state");
	let outcome = gate.handle(&mut ctx).await.expect("Verified callback should authenticate.");

	mock.assert_async().await;

	let GateOutcome::Authenticated(client) = outcome else {
		panic!("Verified callback should attach a client.");
	};

	assert_eq!(client.token().expose(), "TOK123");
	assert_eq!(session.get(STATE_SESSION_KEY), None, "The nonce must be consumed.");
}

#[tokio::test]
async fn forged_callback_restarts_the_flow_without_a_network_call() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "expected-state".into());

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(200).body("access_token=SHOULD_NOT_HAPPEN");
		})
		.await;
	let mut ctx = ctx_with(&session, "/cb?code=abc&state=forged-state");
	let outcome = gate.handle(&mut ctx).await.expect("Forged callback should yield a challenge.");
	let GateOutcome::Challenge(page) = outcome else {
		panic!("Forged callback should not authenticate.");
	};

	assert_eq!(page.location(), REDIRECT_URI);
	assert_eq!(mock.hits_async().await, 0);
	assert_eq!(session.get(STATE_SESSION_KEY), None, "The nonce must still be consumed.");
}

#[tokio::test]
async fn callback_without_a_stored_nonce_restarts_the_flow() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();
	let mut ctx = ctx_with(&session, "/cb?code=abc&state=whatever");
	let outcome = gate.handle(&mut ctx).await.expect("Unsolicited callback should challenge.");
	let GateOutcome::Challenge(page) = outcome else {
		panic!("Unsolicited callback should not authenticate.");
	};

	assert_eq!(page.location(), REDIRECT_URI);
}

#[tokio::test]
async fn a_verified_callback_cannot_be_replayed() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "expected-state".into());

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(200).body("access_token=TOK123");
		})
		.await;
	let mut first = ctx_with(&session, "/cb?code=abc&state=expected-state");
	let first_outcome = gate.handle(&mut first).await.expect("First callback should succeed.");

	assert!(matches!(first_outcome, GateOutcome::Authenticated(_)));

	let mut replay = ctx_with(&session, "/cb?code=abc&state=expected-state");
	let replay_outcome = gate.handle(&mut replay).await.expect("Replay should challenge.");

	assert!(matches!(replay_outcome, GateOutcome::Challenge(_)));
	assert_eq!(mock.hits_async().await, 1, "The exchange must run exactly once.");
}

#[tokio::test]
async fn missing_session_is_fatal_for_the_code_round_trip() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let mut ctx = RequestContext::new("/cb");
	let err = gate.handle(&mut ctx).await.expect_err("Missing session should be fatal.");

	assert!(matches!(err, Error::SessionUnavailable));
}

#[tokio::test]
async fn failed_exchange_surfaces_a_token_exchange_error() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "expected-state".into());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(400).body("error=invalid_code");
		})
		.await;
	let mut ctx = ctx_with(&session, "/cb?code=expired&state=expected-state");
	let err = gate.handle(&mut ctx).await.expect_err("Failed exchange should error.");

	match err {
		Error::TokenExchange { message, kind } => {
			assert_eq!(message, "can't get access token");
			assert_eq!(kind, "unknown");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn exchange_timeout_is_a_retryable_transient_error() {
	let server = MockServer::start_async().await;
	let config = test_config(&server.url(""));
	let gate = oauth2_gate::gate::AuthGate::with_http_client(
		config,
		test_http_client_with_timeout(Duration::from_millis(100)),
	);
	let session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "expected-state".into());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(200).delay(Duration::from_secs(5)).body("access_token=TOK123");
		})
		.await;
	let mut ctx = ctx_with(&session, "/cb?code=abc&state=expected-state");
	let err = gate.handle(&mut ctx).await.expect_err("Slow exchange should time out.");

	assert!(matches!(err, Error::Transient(TransientError::Timeout { stage: "token" })));
}

#[tokio::test]
async fn posted_signed_payload_authenticates_without_any_network_call() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(200).body("access_token=SHOULD_NOT_HAPPEN");
		})
		.await;
	let raw = sign_test_payload("HMAC-SHA256", Some("SIGNED_TOKEN"), APP_SECRET);
	// No session handle: the trusted-payload state must not require one.
	let mut ctx = RequestContext::new("/cb").with_body_field("signed_request", raw);
	let outcome = gate.handle(&mut ctx).await.expect("Signed payload should authenticate.");
	let GateOutcome::Authenticated(client) = outcome else {
		panic!("Signed payload should attach a client.");
	};

	assert_eq!(client.token().expose(), "SIGNED_TOKEN");
	assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn cookie_signed_payload_is_accepted_as_a_fallback() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let raw = sign_test_payload("HMAC-SHA256", Some("COOKIE_TOKEN"), APP_SECRET);
	let mut ctx = RequestContext::new("/cb").with_cookie("signed_request", raw);
	let outcome = gate.handle(&mut ctx).await.expect("Cookie payload should authenticate.");
	let GateOutcome::Authenticated(client) = outcome else {
		panic!("Cookie payload should attach a client.");
	};

	assert_eq!(client.token().expose(), "COOKIE_TOKEN");
}

#[tokio::test]
async fn forged_signed_payload_falls_through_to_the_dialog_redirect() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();
	let raw = sign_test_payload("HMAC-SHA256", Some("FORGED"), "wrong-secret");
	let mut ctx = RequestContext::new("/cb")
		.with_body_field("signed_request", raw)
		.with_session(Arc::new(session.clone()));
	let outcome = gate.handle(&mut ctx).await.expect("Forged payload should fall through.");

	assert!(matches!(outcome, GateOutcome::Challenge(_)));
	assert!(session.get(STATE_SESSION_KEY).is_some(), "The code flow should have started.");
}

#[tokio::test]
async fn token_less_signed_payload_falls_through_to_the_dialog_redirect() {
	let server = MockServer::start_async().await;
	let gate = build_test_gate(&server.url(""));
	let session = MemorySession::default();
	let raw = sign_test_payload("HMAC-SHA256", None, APP_SECRET);
	let mut ctx = RequestContext::new("/cb")
		.with_body_field("signed_request", raw)
		.with_session(Arc::new(session.clone()));
	let outcome = gate.handle(&mut ctx).await.expect("Token-less payload should fall through.");

	assert!(matches!(outcome, GateOutcome::Challenge(_)));
}
