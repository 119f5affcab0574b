//! Google adapter.

// self
use crate::{
	_prelude::*,
	auth::TokenSet,
	client::{ClientConfig, OAuth2Client},
	http::HttpTransport,
	obs::{self, CallKind},
	provider::{IdentityProvider, ProviderEndpoints, ProviderFuture, claim_bool, claim_string},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Registry name of the Google adapter.
pub const GOOGLE_NAME: &str = "google";
/// Google's authorization endpoint.
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google's token endpoint.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
/// Google's OpenID Connect userinfo endpoint.
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
/// Scopes every Google login requests.
pub const GOOGLE_DEFAULT_SCOPES: &[&str] = &[
	"https://www.googleapis.com/auth/userinfo.email",
	"https://www.googleapis.com/auth/userinfo.profile",
	"openid",
];

#[cfg(feature = "reqwest")]
/// Google adapter on the crate's default reqwest transport.
pub type ReqwestGoogle = Google<ReqwestHttpClient>;

/// Google OAuth 2.0 / OpenID Connect adapter.
///
/// Identity claims come from the userinfo document: `sub` is the user id and
/// `email_verified` defaults to `false` when absent.
pub struct Google<C>
where
	C: ?Sized + HttpTransport,
{
	client: OAuth2Client<C>,
	endpoints: ProviderEndpoints,
}
impl<C> Google<C>
where
	C: ?Sized + HttpTransport,
{
	/// Builds the adapter on a caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: Arc<C>) -> Result<Self> {
		let endpoints = ProviderEndpoints::parse(
			GOOGLE_AUTHORIZATION_ENDPOINT,
			GOOGLE_TOKEN_ENDPOINT,
			GOOGLE_USERINFO_ENDPOINT,
		)?;

		Ok(Self {
			client: OAuth2Client::new(GOOGLE_NAME, config, GOOGLE_DEFAULT_SCOPES, transport),
			endpoints,
		})
	}

	/// Points the adapter at other endpoints (proxies, stubs).
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Result<Self> {
		endpoints.validate()?;

		self.endpoints = endpoints;

		Ok(self)
	}

	/// Shared client base.
	pub fn client(&self) -> &OAuth2Client<C> {
		&self.client
	}

	/// Endpoints in use.
	pub fn endpoints(&self) -> &ProviderEndpoints {
		&self.endpoints
	}

	async fn exchange(&self, params: &[(&str, &str)]) -> Result<TokenSet> {
		let mut headers = HeaderMap::new();

		headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

		let body = self.client.post_form(self.endpoints.token.clone(), params, headers).await?;

		Ok(TokenSet::from_json(&body))
	}

	async fn userinfo(&self, access_token: &str) -> Result<JsonValue> {
		obs::observe(
			GOOGLE_NAME,
			CallKind::UserInfo,
			self.client.get_json(self.endpoints.userinfo.clone(), access_token),
		)
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Google<ReqwestHttpClient> {
	/// Builds the adapter with a default [`ReqwestHttpClient`].
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_transport(config, Arc::new(ReqwestHttpClient::new()?))
	}
}
impl<C> IdentityProvider for Google<C>
where
	C: ?Sized + HttpTransport,
{
	fn name(&self) -> &'static str {
		GOOGLE_NAME
	}

	fn login_url(&self) -> Url {
		self.client.authorize_url(&self.endpoints.authorization, &[])
	}

	fn tokens<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenSet> {
		Box::pin(obs::observe(GOOGLE_NAME, CallKind::TokenExchange, async move {
			let redirect_uri = self.client.config().redirect_uri.as_str();

			self.exchange(&[
				("grant_type", "authorization_code"),
				("code", code),
				("redirect_uri", redirect_uri),
			])
			.await
		}))
	}

	fn refresh_tokens<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, TokenSet> {
		Box::pin(obs::observe(GOOGLE_NAME, CallKind::TokenRefresh, async move {
			let tokens = self
				.exchange(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
				.await?;

			Ok(tokens.with_fallback_refresh_token(refresh_token))
		}))
	}

	fn user_id<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(claim_string(&self.userinfo(access_token).await?, "sub")) })
	}

	fn user_email<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(claim_string(&self.userinfo(access_token).await?, "email")) })
	}

	fn is_email_verified<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, bool> {
		Box::pin(
			async move { Ok(claim_bool(&self.userinfo(access_token).await?, "email_verified")) },
		)
	}

	fn user_name<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(claim_string(&self.userinfo(access_token).await?, "name")) })
	}

	fn scopes(&self) -> &[String] {
		self.client.scopes()
	}
}
impl<C> Debug for Google<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Google")
			.field("client", &self.client)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn google(transport: StubTransport) -> Google<StubTransport> {
		let config = ClientConfig::new("gid", "gsecret", "https://app.example.com/cb")
			.expect("Redirect URI fixture should parse.")
			.with_scopes(["openid", "https://www.googleapis.com/auth/calendar.readonly"]);

		Google::with_transport(config, Arc::new(transport)).expect("Google should build.")
	}

	#[test]
	fn default_scopes_come_first() {
		let google = google(StubTransport::default());

		assert_eq!(google.scopes(), [
			"https://www.googleapis.com/auth/userinfo.email",
			"https://www.googleapis.com/auth/userinfo.profile",
			"openid",
			"https://www.googleapis.com/auth/calendar.readonly",
		]);
		assert!(google.login_url().as_str().starts_with(GOOGLE_AUTHORIZATION_ENDPOINT));
	}

	#[tokio::test]
	async fn code_exchange_posts_grant_and_redirect() {
		let transport = StubTransport::default().respond(200, "{\"access_token\":\"A\"}");
		let tokens =
			google(transport.clone()).tokens("4/0Ab").await.expect("Exchange should succeed.");
		let request = &transport.requests()[0];
		let form = url::form_urlencoded::parse(request.body.as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();

		assert_eq!(tokens.access_token.expose(), "A");
		assert_eq!(request.url.as_str(), GOOGLE_TOKEN_ENDPOINT);
		assert_eq!(form.get("grant_type").map(String::as_str), Some("authorization_code"));
		assert_eq!(form.get("code").map(String::as_str), Some("4/0Ab"));
		assert_eq!(form.get("redirect_uri").map(String::as_str), Some("https://app.example.com/cb"));
		assert_eq!(form.get("client_secret").map(String::as_str), Some("gsecret"));
	}

	#[tokio::test]
	async fn code_exchange_keeps_redirect_uri_as_registered() {
		let transport = StubTransport::default().respond(200, "{\"access_token\":\"A\"}");
		let config = ClientConfig::new("gid", "gsecret", "https://app.example.com")
			.expect("Redirect URI fixture should parse.");
		let google = Google::with_transport(config, Arc::new(transport.clone()))
			.expect("Google should build.");

		google.tokens("4/0Ab").await.expect("Exchange should succeed.");

		let request = &transport.requests()[0];
		let form = url::form_urlencoded::parse(request.body.as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();

		assert_eq!(form.get("redirect_uri").map(String::as_str), Some("https://app.example.com"));
	}

	#[tokio::test]
	async fn refresh_keeps_presented_token() {
		let transport =
			StubTransport::default().respond(200, "{\"access_token\":\"A2\",\"expires_in\":3599}");
		let tokens = google(transport).refresh_tokens("R1").await.expect("Refresh should succeed.");

		assert_eq!(tokens.access_token.expose(), "A2");
		assert_eq!(tokens.refresh_token_or_empty(), "R1");
		assert_eq!(tokens.expires_in, 3599);
	}

	#[tokio::test]
	async fn userinfo_claims_map_to_accessors() {
		let transport = StubTransport::default().respond(
			200,
			"{\"sub\":\"1090\",\"email\":\"ada@example.com\",\"name\":\"Ada Lovelace\"}",
		);
		let google = google(transport.clone());

		assert_eq!(google.user_id("tok").await.ok().as_deref(), Some("1090"));
		assert_eq!(google.user_email("tok").await.ok().as_deref(), Some("ada@example.com"));
		assert_eq!(google.user_name("tok").await.ok().as_deref(), Some("Ada Lovelace"));
		assert_eq!(google.is_email_verified("tok").await.ok(), Some(false));
		assert_eq!(transport.requests().len(), 4);
		assert_eq!(transport.requests()[0].url.as_str(), GOOGLE_USERINFO_ENDPOINT);
	}
}
