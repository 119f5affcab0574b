//! GitHub adapter.

// self
use crate::{
	_prelude::*,
	auth::TokenSet,
	client::{ClientConfig, OAuth2Client},
	error::ConfigError,
	http::HttpTransport,
	obs::{self, CallKind},
	provider::{IdentityProvider, ProviderEndpoints, ProviderFuture, claim_bool, claim_string},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Registry name of the GitHub adapter.
pub const GITHUB_NAME: &str = "github";
/// GitHub's authorization endpoint.
pub const GITHUB_AUTHORIZATION_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
/// GitHub's token endpoint.
pub const GITHUB_TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
/// GitHub's authenticated-user endpoint; the email list lives under its `emails` child.
pub const GITHUB_USER_ENDPOINT: &str = "https://api.github.com/user";
/// Scopes every GitHub login requests.
pub const GITHUB_DEFAULT_SCOPES: &[&str] = &["user:email"];

#[cfg(feature = "reqwest")]
/// GitHub adapter on the crate's default reqwest transport.
pub type ReqwestGitHub = GitHub<ReqwestHttpClient>;

/// GitHub OAuth App adapter.
///
/// The token endpoint answers with a form-encoded body unless asked otherwise. User ids are
/// numeric and rendered in decimal. The email is the entry flagged both `primary` and `verified`
/// in the user's email list, and an address counts as verified exactly when such an entry exists.
pub struct GitHub<C>
where
	C: ?Sized + HttpTransport,
{
	client: OAuth2Client<C>,
	endpoints: ProviderEndpoints,
	emails: Url,
}
impl<C> GitHub<C>
where
	C: ?Sized + HttpTransport,
{
	/// Builds the adapter on a caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: Arc<C>) -> Result<Self> {
		let endpoints = ProviderEndpoints::parse(
			GITHUB_AUTHORIZATION_ENDPOINT,
			GITHUB_TOKEN_ENDPOINT,
			GITHUB_USER_ENDPOINT,
		)?;
		let emails = emails_endpoint(&endpoints.userinfo)?;

		Ok(Self {
			client: OAuth2Client::new(GITHUB_NAME, config, GITHUB_DEFAULT_SCOPES, transport),
			endpoints,
			emails,
		})
	}

	/// Points the adapter at other endpoints (GitHub Enterprise, stubs).
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Result<Self> {
		endpoints.validate()?;

		self.emails = emails_endpoint(&endpoints.userinfo)?;
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
		let body =
			self.client.post_form(self.endpoints.token.clone(), params, HeaderMap::new()).await?;

		Ok(TokenSet::from_body(&body))
	}

	async fn user(&self, access_token: &str) -> Result<JsonValue> {
		obs::observe(
			GITHUB_NAME,
			CallKind::UserInfo,
			self.client.get_json(self.endpoints.userinfo.clone(), access_token),
		)
		.await
	}

	async fn primary_email(&self, access_token: &str) -> Result<Option<String>> {
		let emails = obs::observe(
			GITHUB_NAME,
			CallKind::UserInfo,
			self.client.get_json(self.emails.clone(), access_token),
		)
		.await?;

		Ok(primary_verified_email(&emails))
	}
}
#[cfg(feature = "reqwest")]
impl GitHub<ReqwestHttpClient> {
	/// Builds the adapter with a default [`ReqwestHttpClient`].
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_transport(config, Arc::new(ReqwestHttpClient::new()?))
	}
}
impl<C> IdentityProvider for GitHub<C>
where
	C: ?Sized + HttpTransport,
{
	fn name(&self) -> &'static str {
		GITHUB_NAME
	}

	fn login_url(&self) -> Url {
		self.client.authorize_url(&self.endpoints.authorization, &[])
	}

	fn tokens<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenSet> {
		Box::pin(obs::observe(GITHUB_NAME, CallKind::TokenExchange, async move {
			let redirect_uri = self.client.config().redirect_uri.as_str();

			self.exchange(&[("code", code), ("redirect_uri", redirect_uri)]).await
		}))
	}

	fn refresh_tokens<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, TokenSet> {
		Box::pin(obs::observe(GITHUB_NAME, CallKind::TokenRefresh, async move {
			let tokens = self
				.exchange(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
				.await?;

			Ok(tokens.with_fallback_refresh_token(refresh_token))
		}))
	}

	fn user_id<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(claim_string(&self.user(access_token).await?, "id")) })
	}

	fn user_email<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(self.primary_email(access_token).await?.unwrap_or_default()) })
	}

	fn is_email_verified<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, bool> {
		Box::pin(async move { Ok(self.primary_email(access_token).await?.is_some()) })
	}

	fn user_name<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, String> {
		Box::pin(async move { Ok(claim_string(&self.user(access_token).await?, "name")) })
	}

	fn scopes(&self) -> &[String] {
		self.client.scopes()
	}
}
impl<C> Debug for GitHub<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GitHub")
			.field("client", &self.client)
			.field("endpoints", &self.endpoints)
			.field("emails", &self.emails.as_str())
			.finish()
	}
}

fn emails_endpoint(user: &Url) -> Result<Url, ConfigError> {
	let mut emails = user.clone();

	emails
		.path_segments_mut()
		.map_err(|_| ConfigError::InvalidEndpoint {
			endpoint: "userinfo",
			source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
		})?
		.pop_if_empty()
		.push("emails");

	Ok(emails)
}

fn primary_verified_email(emails: &JsonValue) -> Option<String> {
	emails
		.as_array()?
		.iter()
		.find(|entry| claim_bool(entry, "primary") && claim_bool(entry, "verified"))
		.map(|entry| claim_string(entry, "email"))
}
