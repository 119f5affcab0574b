//! Validated endpoint sets for provider adapters.

// crates.io
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoints an adapter talks to.
///
/// Every URL must use HTTPS; plain HTTP is accepted only for loopback hosts so local stubs and
/// development proxies keep working.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the login URL points at.
	pub authorization: Url,
	/// Token endpoint used for code exchanges and refreshes.
	pub token: Url,
	/// Identity endpoint queried with the access token.
	pub userinfo: Url,
}
impl ProviderEndpoints {
	/// Creates a new builder with no endpoints set.
	pub fn builder() -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::default()
	}

	/// Parses and validates three endpoint strings.
	pub fn parse(authorization: &str, token: &str, userinfo: &str) -> Result<Self, ConfigError> {
		Self::builder()
			.authorization(parse_endpoint("authorization", authorization)?)
			.token(parse_endpoint("token", token)?)
			.userinfo(parse_endpoint("userinfo", userinfo)?)
			.build()
	}

	/// Checks every endpoint against the transport security rules.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("authorization", &self.authorization)?;
		validate_endpoint("token", &self.token)?;
		validate_endpoint("userinfo", &self.userinfo)?;

		Ok(())
	}
}

/// Builder for [`ProviderEndpoints`] values.
#[derive(Debug, Default)]
pub struct ProviderEndpointsBuilder {
	authorization: Option<Url>,
	token: Option<Url>,
	userinfo: Option<Url>,
}
impl ProviderEndpointsBuilder {
	/// Sets the authorization endpoint.
	pub fn authorization(mut self, url: Url) -> Self {
		self.authorization = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token(mut self, url: Url) -> Self {
		self.token = Some(url);

		self
	}

	/// Sets the identity endpoint.
	pub fn userinfo(mut self, url: Url) -> Self {
		self.userinfo = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoint set.
	pub fn build(self) -> Result<ProviderEndpoints, ConfigError> {
		let endpoints = ProviderEndpoints {
			authorization: self
				.authorization
				.ok_or(ConfigError::MissingEndpoint("authorization"))?,
			token: self.token.ok_or(ConfigError::MissingEndpoint("token"))?,
			userinfo: self.userinfo.ok_or(ConfigError::MissingEndpoint("userinfo"))?,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}
}

/// Parses `raw` as the `endpoint` URL.
pub fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}
