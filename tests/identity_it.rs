#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use session_gateway::{
	config::GatewayConfig,
	error::Error,
	gateway::ReqwestGateway,
	identity::{Credentials, Registration},
};

fn build_gateway(server: &MockServer) -> ReqwestGateway {
	let config = GatewayConfig::builder(
		Url::parse(&server.url("/api/v1")).expect("Mock base URL should parse successfully."),
	)
	.build()
	.expect("Default configuration should validate for the mock server.");

	ReqwestGateway::new(config).expect("Reqwest gateway should build for the mock server.")
}

fn user_body() -> serde_json::Value {
	json!({
		"success": true,
		"user": {
			"_id": "665f1c2e9b1d",
			"name": "Ada Lovelace",
			"email": "ada@example.com",
			"role": "USER"
		}
	})
}

#[tokio::test]
async fn login_signs_in_and_logout_signs_out() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/auth/login")
				.json_body(json!({ "email": "ada@example.com", "password": "hunter22" }));
			then.status(200).json_body(user_body());
		})
		.await;
	let logout = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/auth/logout");
			then.status(200).json_body(json!({ "success": true }));
		})
		.await;
	let gateway = build_gateway(&server);
	let identity = gateway
		.login(&Credentials::new("ada@example.com", "hunter22"))
		.await
		.expect("Login with valid credentials should succeed.");

	login.assert_async().await;

	assert_eq!(identity.id, "665f1c2e9b1d");
	assert_eq!(identity.role.as_deref(), Some("USER"));
	assert_eq!(gateway.session().identity(), Some(identity));

	gateway.logout().await.expect("Logout should succeed.");
	logout.assert_async().await;

	assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn rejected_login_is_unauthorized_without_refresh() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/login");
			then.status(401).json_body(json!({ "message": "Invalid credentials" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refreshToken");
			then.status(200);
		})
		.await;
	let gateway = build_gateway(&server);
	let err = gateway
		.login(&Credentials::new("ada@example.com", "wrong"))
		.await
		.expect_err("Bad credentials must be rejected.");

	match err {
		Error::Unauthorized { path, response } => {
			assert_eq!(path, "/auth/login");
			assert!(response.text().contains("Invalid credentials"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	login.assert_async().await;
	refresh.assert_calls_async(0).await;

	assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn check_session_refreshes_the_identity() {
	let server = MockServer::start_async().await;
	let check = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/auth/check");
			then.status(200).json_body(user_body());
		})
		.await;
	let gateway = build_gateway(&server);
	let identity = gateway.check_session().await.expect("Session check should succeed.");

	check.assert_async().await;

	assert_eq!(identity.email, "ada@example.com");
	assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn malformed_identity_reports_decode_error() {
	let server = MockServer::start_async().await;
	let _check = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/auth/check");
			then.status(200).json_body(json!({ "user": { "name": "Ada" } }));
		})
		.await;
	let gateway = build_gateway(&server);
	let err = gateway.check_session().await.expect_err("Incomplete identity must not decode.");

	match err {
		Error::Decode { source, status } => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "user");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn register_and_resend_verification_post_json() {
	let server = MockServer::start_async().await;
	let register = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/register").json_body(json!({
				"name": "Ada Lovelace",
				"email": "ada@example.com",
				"password": "hunter22"
			}));
			then.status(201).json_body(json!({ "success": true }));
		})
		.await;
	let resend = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/auth/resendVerification")
				.json_body(json!({ "email": "ada@example.com" }));
			then.status(200).json_body(json!({ "success": true }));
		})
		.await;
	let gateway = build_gateway(&server);

	gateway
		.register(&Registration::new("Ada Lovelace", "ada@example.com", "hunter22"))
		.await
		.expect("Registration should succeed.");
	gateway
		.resend_verification("ada@example.com")
		.await
		.expect("Verification resend should succeed.");

	register.assert_async().await;
	resend.assert_async().await;

	assert!(!gateway.session().is_authenticated());
}
