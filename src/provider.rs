//! Identity provider capability and the bundled adapters.
//!
//! [`IdentityProvider`] is the provider-agnostic surface callers program against. Adapters
//! ([`Google`], [`GitHub`]) compose an [`OAuth2Client`](crate::client::OAuth2Client) and supply
//! only endpoint URLs plus response-field mappings; every network call they make goes through the
//! client's shared request primitive.

pub mod endpoints;
pub mod github;
pub mod google;

pub use endpoints::*;
pub use github::*;
pub use google::*;

// self
use crate::{
	_prelude::*,
	auth::{StateBlob, TokenSet},
	client::ClientConfig,
	error::ConfigError,
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Future type returned by [`IdentityProvider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Provider-agnostic OAuth 2.0 login capability.
///
/// Every accessor performs its own provider call and nothing is cached: calling
/// [`access_token`](Self::access_token), [`refresh_token`](Self::refresh_token), and
/// [`access_token_expiry`](Self::access_token_expiry) with the same code exchanges it three
/// times. Callers that need more than one field should use [`tokens`](Self::tokens) once.
/// Authorization codes are single-use at most providers, so only the first exchange is likely
/// to succeed.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	/// Stable provider identifier, e.g. `"google"`.
	fn name(&self) -> &'static str;

	/// Authorization URL embedding the client id, redirect URI, scopes, and serialized state.
	fn login_url(&self) -> Url;

	/// Exchanges an authorization code at the token endpoint.
	fn tokens<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenSet>;

	/// Exchanges a refresh token for a new token set.
	///
	/// When the provider does not rotate the refresh token, the presented one is carried into the
	/// returned set.
	fn refresh_tokens<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, TokenSet>;

	/// Canonical user identifier.
	fn user_id<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String>;

	/// User email address; empty when the provider exposes none.
	fn user_email<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String>;

	/// Whether the provider vouches for the user's email address.
	fn is_email_verified<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, bool>;

	/// Display name; empty when the provider exposes none.
	fn user_name<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String>;

	/// Scopes requested in the login URL, in request order.
	fn scopes(&self) -> &[String];

	/// Access token for `code`, or `""` when the provider omitted it.
	fn access_token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(self.tokens(code).await?.access_token.into_inner()) })
	}

	/// Refresh token for `code`, or `""` when the provider issued none.
	fn refresh_token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(self.tokens(code).await?.refresh_token_or_empty().to_owned()) })
	}

	/// Access token lifetime in seconds for `code`, or `0` when unknown.
	fn access_token_expiry<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, u64> {
		Box::pin(async move { Ok(self.tokens(code).await?.expires_in) })
	}

	/// Decodes a returned `state` value; `None` unless it is a JSON object.
	fn parse_state(&self, state: &str) -> Option<StateBlob> {
		crate::auth::parse_state(state)
	}
}

/// Builds the adapter registered under `name` (case-insensitive) on top of `transport`.
pub fn from_name_with_transport<C>(
	name: &str,
	config: ClientConfig,
	transport: Arc<C>,
) -> Result<Box<dyn IdentityProvider>>
where
	C: ?Sized + HttpTransport,
{
	match name.to_ascii_lowercase().as_str() {
		GOOGLE_NAME => Ok(Box::new(Google::with_transport(config, transport)?)),
		GITHUB_NAME => Ok(Box::new(GitHub::with_transport(config, transport)?)),
		_ => Err(ConfigError::UnknownProvider(name.to_owned()).into()),
	}
}

/// Builds the adapter registered under `name` with the default reqwest transport.
#[cfg(feature = "reqwest")]
pub fn from_name(name: &str, config: ClientConfig) -> Result<Box<dyn IdentityProvider>> {
	from_name_with_transport(name, config, Arc::new(ReqwestHttpClient::new()?))
}

/// Reads `key` as a string claim; numbers are rendered in decimal, anything else is empty.
pub(crate) fn claim_string(document: &JsonValue, key: &str) -> String {
	match document.get(key) {
		Some(JsonValue::String(value)) => value.clone(),
		Some(JsonValue::Number(value)) => value.to_string(),
		_ => String::new(),
	}
}

/// Reads `key` as a boolean claim; `"true"` strings count, anything else is `false`.
pub(crate) fn claim_bool(document: &JsonValue, key: &str) -> bool {
	match document.get(key) {
		Some(JsonValue::Bool(value)) => *value,
		Some(JsonValue::String(value)) => value.eq_ignore_ascii_case("true"),
		_ => false,
	}
}
