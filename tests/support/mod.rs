//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use oauth2_identity::{
	client::ClientConfig,
	http::ReqwestHttpClient,
	provider::{GitHub, Google, ProviderEndpoints},
	url::Url,
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const REDIRECT_URI: &str = "https://app.example.com/v1/account/sessions/oauth2/callback";

pub fn config() -> ClientConfig {
	ClientConfig::new(CLIENT_ID, CLIENT_SECRET, REDIRECT_URI)
		.expect("Redirect URI fixture should parse.")
}

pub fn url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

pub fn endpoints(server: &MockServer) -> ProviderEndpoints {
	ProviderEndpoints::builder()
		.authorization(url(server, "/authorize"))
		.token(url(server, "/token"))
		.userinfo(url(server, "/user"))
		.build()
		.expect("Loopback endpoints should validate.")
}

pub fn google(server: &MockServer, config: ClientConfig) -> Google<ReqwestHttpClient> {
	Google::new(config)
		.and_then(|google| google.with_endpoints(endpoints(server)))
		.expect("Google adapter should build against the mock server.")
}

pub fn github(server: &MockServer, config: ClientConfig) -> GitHub<ReqwestHttpClient> {
	GitHub::new(config)
		.and_then(|github| github.with_endpoints(endpoints(server)))
		.expect("GitHub adapter should build against the mock server.")
}
