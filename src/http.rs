//! Transport primitives for provider calls.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack: it executes one
//! fully-formed [`ProviderRequest`] and reports the status and body. Header policy and error
//! classification live one level up in [`OAuth2Client::request`](crate::client::OAuth2Client::request)
//! so every transport behaves the same way.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Fixed `User-Agent` sent with every provider call.
pub const USER_AGENT: &str = concat!("oauth2-identity/", env!("CARGO_PKG_VERSION"));

/// Future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<ProviderResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports that can reach identity providers.
///
/// Implementations must be `Send + Sync + 'static` so clients can share them behind an [`Arc`].
/// A transport reports every response it receives, including 4xx/5xx ones; only failures that
/// produced no response at all (DNS, TLS, connection reset, timeout) belong in
/// [`TransportError`](Self::TransportError).
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` exactly once.
	fn execute(&self, request: ProviderRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Outbound request handed to a transport.
#[derive(Clone, Debug)]
pub struct ProviderRequest {
	/// HTTP method.
	pub method: Method,
	/// Target URL.
	pub url: Url,
	/// Complete header set, including `Content-Length` and `User-Agent`.
	pub headers: HeaderMap,
	/// Request payload; empty when the request carries no body.
	pub body: String,
}

/// Status and body captured from a provider response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}

/// Timeouts applied by [`ReqwestHttpClient::with_settings`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpSettings {
	/// Upper bound for a whole request, from connect to the last body byte.
	pub timeout: StdDuration,
	/// Upper bound for establishing the connection.
	pub connect_timeout: StdDuration,
}
impl HttpSettings {
	/// Overrides the whole-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the connect timeout.
	pub fn with_connect_timeout(mut self, timeout: StdDuration) -> Self {
		self.connect_timeout = timeout;

		self
	}
}
impl Default for HttpSettings {
	fn default() -> Self {
		Self { timeout: StdDuration::from_secs(30), connect_timeout: StdDuration::from_secs(10) }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Provider endpoints answer directly, so the client built by [`with_settings`](Self::with_settings)
/// never follows redirects. Configure any custom [`ReqwestClient`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with the default [`HttpSettings`].
	pub fn new() -> Result<Self> {
		Self::with_settings(HttpSettings::default())
	}

	/// Builds a client that applies `settings` and refuses redirects.
	pub fn with_settings(settings: HttpSettings) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(settings.timeout)
			.connect_timeout(settings.connect_timeout)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ProviderRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let ProviderRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if !body.is_empty() {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();

			body_or_status(status, response.text().await)
		})
	}
}

/// Keeps an error status when its body cannot be read.
#[cfg(feature = "reqwest")]
fn body_or_status<E>(status: u16, body: Result<String, E>) -> Result<ProviderResponse, E> {
	match body {
		Ok(body) => Ok(ProviderResponse { status, body }),
		Err(_) if status >= 400 => Ok(ProviderResponse { status, body: String::new() }),
		Err(e) => Err(e),
	}
}
