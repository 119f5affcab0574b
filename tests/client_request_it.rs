#![cfg(feature = "reqwest")]

mod support;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use oauth2_identity::{
	client::OAuth2Client,
	error::{ProviderErrorKind, ProviderRequestError},
	http::{ReqwestHttpClient, USER_AGENT},
	oauth2::http::{HeaderMap, HeaderValue, Method, header},
	url::Url,
};

fn client() -> OAuth2Client<ReqwestHttpClient> {
	let transport = ReqwestHttpClient::new().expect("Default reqwest client should build.");

	OAuth2Client::new("mock", support::config(), &[], Arc::new(transport))
}

#[tokio::test]
async fn error_status_surfaces_status_and_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/missing");
			then.status(404).body("not found");
		})
		.await;
	let err = client()
		.request(Method::GET, support::url(&server, "/missing"), HeaderMap::new(), "")
		.await
		.expect_err("A 404 response must fail.");

	mock.assert_async().await;

	assert_eq!(err.status, 404);
	assert_eq!(err.body, "not found");
	assert_eq!(err.to_string(), "not found");
	assert_eq!(err.kind(), ProviderErrorKind::InvalidGrant);
}

#[tokio::test]
async fn oauth_error_documents_are_parsed() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"Bad Request\"}");
		})
		.await;

	let err = client()
		.request(Method::POST, support::url(&server, "/token"), HeaderMap::new(), "code=x")
		.await
		.expect_err("A 400 response must fail.");

	assert_eq!(err.status, 400);
	assert_eq!(err.oauth_error(), Some("invalid_grant"));
	assert_eq!(err.error_description(), Some("Bad Request"));
	assert_eq!(err.to_string(), "invalid_grant: Bad Request");
}

#[tokio::test]
async fn every_request_carries_length_and_user_agent() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/echo")
				.header("content-length", "11")
				.header("user-agent", USER_AGENT)
				.header("x-trace", "abc")
				.body("hello=world");
			then.status(201).header("x-ignored", "yes").body("created");
		})
		.await;
	let mut headers = HeaderMap::new();

	headers.insert("x-trace", HeaderValue::from_static("abc"));
	headers.insert(header::USER_AGENT, HeaderValue::from_static("someone-else/1.0"));

	let body = client()
		.request(Method::POST, support::url(&server, "/echo"), headers, "hello=world")
		.await
		.expect("A 201 response should succeed.");

	mock.assert_async().await;

	assert_eq!(body, "created");
}

#[tokio::test]
async fn bodiless_requests_send_zero_length() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/me")
				.header("content-length", "0")
				.header("user-agent", USER_AGENT);
			then.status(200).body("{}");
		})
		.await;
	let body = client()
		.request(Method::GET, support::url(&server, "/me"), HeaderMap::new(), "")
		.await
		.expect("A 200 response should succeed.");

	mock.assert_async().await;

	assert_eq!(body, "{}");
}

#[tokio::test]
async fn transport_failures_use_status_zero() {
	let unreachable = Url::parse("http://127.0.0.1:1/token").expect("Fixture should parse.");
	let err = client()
		.request(Method::GET, unreachable, HeaderMap::new(), "")
		.await
		.expect_err("A refused connection must fail.");

	assert_eq!(err.status, ProviderRequestError::TRANSPORT_STATUS);
	assert!(err.body.is_empty());
	assert!(err.is_transport());
	assert_eq!(err.kind(), ProviderErrorKind::Transient);
	assert!(std::error::Error::source(&err).is_some());
}
