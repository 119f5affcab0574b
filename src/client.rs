//! Shared client base composed into every provider adapter.
//!
//! [`OAuth2Client`] owns the caller's [`ClientConfig`], the accumulated scope list, and the
//! transport. Adapters delegate to it for authorization URLs, form posts to the token endpoint,
//! bearer-authenticated identity lookups, and the [`request`](OAuth2Client::request) primitive
//! that every provider call funnels through.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope, basic::BasicClient};
// self
use crate::{
	_prelude::*,
	auth::{ScopeList, Secret, StateBlob, encode_state, parse_state},
	error::{ConfigError, ProviderRequestError},
	http::{HttpTransport, ProviderRequest, USER_AGENT},
	obs,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client authentication methods supported at the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic authentication with the client id and secret.
	ClientSecretBasic,
	/// Client credentials sent in the form body.
	#[default]
	ClientSecretPost,
}

/// Caller-supplied registration data for one provider.
///
/// The configuration is consumed when an adapter is built; scopes added here are requested after
/// the adapter's defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Client identifier issued by the provider.
	pub client_id: String,
	/// Client secret issued by the provider.
	pub client_secret: Secret,
	/// Redirect URI registered with the provider.
	///
	/// Sent exactly as supplied; providers compare it byte-for-byte with the registered value.
	pub redirect_uri: RedirectUrl,
	/// Context echoed back through the `state` parameter.
	#[serde(default)]
	pub state: StateBlob,
	/// Extra scopes requested on top of the adapter's defaults.
	#[serde(default)]
	pub scopes: ScopeList,
	/// How the client authenticates at the token endpoint.
	#[serde(default)]
	pub client_auth_method: ClientAuthMethod,
}
impl ClientConfig {
	/// Creates a configuration with an empty state blob and no extra scopes.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		redirect_uri: &str,
	) -> Result<Self> {
		let redirect_uri = RedirectUrl::new(redirect_uri.to_owned())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			redirect_uri,
			state: StateBlob::new(),
			scopes: ScopeList::default(),
			client_auth_method: ClientAuthMethod::default(),
		})
	}

	/// Replaces the state blob.
	pub fn with_state(mut self, state: StateBlob) -> Self {
		self.state = state;

		self
	}

	/// Sets a single state entry.
	pub fn with_state_entry(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.state.insert(key.into(), value.into());

		self
	}

	/// Requests an extra scope; duplicates are ignored.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.insert(scope);

		self
	}

	/// Requests several extra scopes; duplicates are ignored.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes.extend(scopes);

		self
	}

	/// Overrides the token endpoint authentication method.
	pub fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}
}

/// Provider-agnostic base that adapters compose.
pub struct OAuth2Client<C>
where
	C: ?Sized + HttpTransport,
{
	provider: &'static str,
	config: ClientConfig,
	transport: Arc<C>,
}
impl<C> OAuth2Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Builds the base for `provider`, requesting `default_scopes` before the configured ones.
	pub fn new(
		provider: &'static str,
		mut config: ClientConfig,
		default_scopes: &[&str],
		transport: Arc<C>,
	) -> Self {
		let requested = std::mem::take(&mut config.scopes);
		let mut client = Self { provider, config, transport };

		for scope in default_scopes {
			client.add_scope(*scope);
		}
		for scope in &requested {
			client.add_scope(scope.as_str());
		}

		client
	}

	/// Appends `scope` unless it is already requested.
	pub(crate) fn add_scope(&mut self, scope: impl Into<String>) -> &mut Self {
		self.config.scopes.insert(scope);

		self
	}

	/// Provider name used in logs and metrics.
	pub fn provider(&self) -> &'static str {
		self.provider
	}

	/// Configuration the client was built with, scopes included.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Scopes in request order.
	pub fn scopes(&self) -> &[String] {
		self.config.scopes.as_slice()
	}

	/// Shared transport handle.
	pub fn transport(&self) -> &Arc<C> {
		&self.transport
	}

	/// Decodes a `state` value returned by the provider; see [`parse_state`].
	pub fn parse_state(&self, state: &str) -> Option<StateBlob> {
		parse_state(state)
	}

	/// Builds the authorization URL for `endpoint` with the client id, redirect URI, scopes, and
	/// state, plus any provider-specific `extra_params`.
	pub fn authorize_url(&self, endpoint: &Url, extra_params: &[(&str, &str)]) -> Url {
		let _guard = obs::CallSpan::new(self.provider, obs::CallKind::LoginUrl).entered();
		let client = BasicClient::new(ClientId::new(self.config.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(endpoint.clone()))
			.set_redirect_uri(self.config.redirect_uri.clone());
		let state = encode_state(&self.config.state);
		let mut request = client
			.authorize_url(|| CsrfToken::new(state))
			.add_scopes(self.config.scopes.iter().cloned().map(Scope::new));

		for (name, value) in extra_params {
			request = request.add_extra_param((*name).to_owned(), (*value).to_owned());
		}

		let (url, _) = request.url();

		url
	}

	/// Sends one HTTP request and returns the response body.
	///
	/// `Content-Length` (the payload's byte length) and the crate's `User-Agent` are always set,
	/// replacing any caller-provided values. Any status of 400 or above becomes a
	/// [`ProviderRequestError`] carrying the status and raw body; a request that never produced
	/// a response becomes one with status `0`.
	pub async fn request(
		&self,
		method: Method,
		url: Url,
		mut headers: HeaderMap,
		payload: &str,
	) -> Result<String, ProviderRequestError> {
		headers.insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));
		headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

		let request = ProviderRequest {
			method: method.clone(),
			url: url.clone(),
			headers,
			body: payload.to_owned(),
		};
		let response =
			self.transport.execute(request).await.map_err(ProviderRequestError::transport)?;

		obs::record_response_status(&method, &url, response.status);

		if response.status >= 400 {
			return Err(ProviderRequestError::from_response(response.status, response.body));
		}

		Ok(response.body)
	}

	/// Posts `params` as a form to `url`, authenticating the client per
	/// [`ClientAuthMethod`].
	pub async fn post_form(
		&self,
		url: Url,
		params: &[(&str, &str)],
		mut headers: HeaderMap,
	) -> Result<String> {
		let body = {
			let mut form = url::form_urlencoded::Serializer::new(String::new());

			form.extend_pairs(params);

			match self.config.client_auth_method {
				ClientAuthMethod::ClientSecretPost => {
					form.append_pair("client_id", &self.config.client_id);
					form.append_pair("client_secret", self.config.client_secret.expose());
				},
				ClientAuthMethod::ClientSecretBasic => {
					headers.insert(
						header::AUTHORIZATION,
						basic_authorization(&self.config.client_id, &self.config.client_secret)?,
					);
				},
			}

			headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

			form.finish()
		};

		Ok(self.request(Method::POST, url, headers, &body).await?)
	}

	/// Fetches `url` with a bearer `access_token` and decodes the body as JSON.
	///
	/// Bodies that are not valid JSON decode to [`JsonValue::Null`] so missing claims degrade
	/// to defaults instead of failing.
	pub async fn get_json(&self, url: Url, access_token: &str) -> Result<JsonValue> {
		let mut headers = bearer_headers(access_token)?;

		headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

		let body = self.request(Method::GET, url, headers, "").await?;

		Ok(serde_json::from_str(&body).unwrap_or(JsonValue::Null))
	}
}
impl<C> Debug for OAuth2Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client")
			.field("provider", &self.provider)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

/// Builds an `Authorization: Bearer` header map for `access_token`.
pub fn bearer_headers(access_token: &str) -> Result<HeaderMap> {
	let mut value = HeaderValue::from_str(&format!("Bearer {access_token}"))
		.map_err(|_| ConfigError::InvalidHeader { name: "authorization" })?;
	let mut headers = HeaderMap::new();

	value.set_sensitive(true);
	headers.insert(header::AUTHORIZATION, value);

	Ok(headers)
}

fn basic_authorization(client_id: &str, client_secret: &Secret) -> Result<HeaderValue> {
	let encode =
		|value: &str| url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>();
	let credentials = format!("{}:{}", encode(client_id), encode(client_secret.expose()));
	let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
		.map_err(|_| ConfigError::InvalidHeader { name: "authorization" })?;

	value.set_sensitive(true);

	Ok(value)
}
