//! Crate-level error types shared by the client, provider adapters, and the event queue.
//!
//! [`ProviderRequestError`] is the one error kind produced by the shared HTTP primitive, so every
//! token and identity accessor surfaces provider failures through it. Local problems (bad
//! endpoints, unbuildable HTTP clients, header values that cannot be encoded) are reported as
//! [`ConfigError`] before any request leaves the process.

// self
use crate::{_prelude::*, event::QueueError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Provider answered with HTTP status >= 400, or the request never completed.
	#[error(transparent)]
	Provider(#[from] ProviderRequestError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Job queue rejected or failed to accept a message.
	#[error(transparent)]
	Queue(#[from] QueueError),
}
impl Error {
	/// Returns the provider failure, when this error came from a provider call.
	pub fn as_provider(&self) -> Option<&ProviderRequestError> {
		match self {
			Self::Provider(err) => Some(err),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before contacting a provider.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider endpoint cannot be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider endpoint must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint builder was consumed without a required endpoint.
	#[error("Missing {0} endpoint.")]
	MissingEndpoint(&'static str),
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A value cannot be carried in an HTTP header.
	#[error("The {name} header value is invalid.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
	},
	/// No adapter is registered under the requested name.
	#[error("Unknown identity provider `{0}`.")]
	UnknownProvider(String),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Coarse categories callers can map onto user-facing authentication failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the authorization code or refresh token.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Token does not cover the requested resource.
	InsufficientScope,
	/// Failure is temporary (network, throttling, provider outage).
	Transient,
}

/// Failure of a provider call: an HTTP status >= 400, or a transport failure with status `0`.
///
/// The raw body is kept verbatim. When the body is an OAuth error document the `error` and
/// `error_description` members are parsed out eagerly; Google-style `{"error":{"status",
/// "message"}}` envelopes are understood as well.
pub struct ProviderRequestError {
	/// HTTP status code, or `0` when no response was received.
	pub status: u16,
	/// Raw response body; empty for transport failures.
	pub body: String,
	oauth_error: Option<String>,
	error_description: Option<String>,
	source: Option<BoxError>,
}
impl ProviderRequestError {
	/// Status used for failures that never produced an HTTP response.
	pub const TRANSPORT_STATUS: u16 = 0;

	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds an error from an HTTP response that carried a failing status.
	pub fn from_response(status: u16, body: impl Into<String>) -> Self {
		let body = body.into();
		let (oauth_error, error_description) = parse_oauth_error(&body);

		Self { status, body, oauth_error, error_description, source: None }
	}

	/// Normalizes a transport failure (DNS, TLS, reset, timeout) into a status-`0` error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self {
			status: Self::TRANSPORT_STATUS,
			body: String::new(),
			oauth_error: None,
			error_description: None,
			source: Some(Box::new(src)),
		}
	}

	/// Returns `true` when the request failed before any HTTP response arrived.
	pub fn is_transport(&self) -> bool {
		self.status == Self::TRANSPORT_STATUS
	}

	/// OAuth `error` code reported by the provider, if the body carried one.
	pub fn oauth_error(&self) -> Option<&str> {
		self.oauth_error.as_deref()
	}

	/// OAuth `error_description` reported by the provider, if the body carried one.
	pub fn error_description(&self) -> Option<&str> {
		self.error_description.as_deref()
	}

	/// Classifies the failure using OAuth fields first, then body hints, then the status.
	pub fn kind(&self) -> ProviderErrorKind {
		if self.is_transport() {
			return ProviderErrorKind::Transient;
		}

		classify_oauth_error(self.oauth_error(), self.error_description())
			.or_else(|| classify_body(&self.body))
			.unwrap_or_else(|| classify_status(self.status))
	}

	fn body_preview(&self) -> String {
		if self.body.chars().count() <= Self::BODY_PREVIEW_LIMIT {
			return self.body.clone();
		}

		let mut buf = self.body.chars().take(Self::BODY_PREVIEW_LIMIT).collect::<String>();

		buf.push('…');

		buf
	}
}
impl Debug for ProviderRequestError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRequestError")
			.field("status", &self.status)
			.field("body", &self.body_preview())
			.field("oauth_error", &self.oauth_error)
			.field("error_description", &self.error_description)
			.field("source", &self.source)
			.finish()
	}
}
impl Display for ProviderRequestError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match (&self.oauth_error, &self.error_description) {
			(Some(error), Some(description)) => write!(f, "{error}: {description}"),
			(Some(error), None) => f.write_str(error),
			_ if self.is_transport() => match &self.source {
				Some(source) => write!(f, "Provider request failed without a response: {source}."),
				None => f.write_str("Provider request failed without a response."),
			},
			_ if self.body.is_empty() =>
				write!(f, "Provider request failed with HTTP status {}.", self.status),
			_ => f.write_str(&self.body_preview()),
		}
	}
}
impl StdError for ProviderRequestError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.as_deref().map(|source| source as &(dyn StdError + 'static))
	}
}

fn parse_oauth_error(body: &str) -> (Option<String>, Option<String>) {
	let Ok(JsonValue::Object(document)) = serde_json::from_str::<JsonValue>(body) else {
		return (None, None);
	};

	match document.get("error") {
		Some(JsonValue::Object(envelope)) =>
			(json_text(envelope.get("status")), json_text(envelope.get("message"))),
		Some(error) => (json_text(Some(error)), json_text(document.get("error_description"))),
		None => (None, None),
	}
}

fn json_text(value: Option<&JsonValue>) -> Option<String> {
	match value? {
		JsonValue::String(text) => Some(text.clone()),
		JsonValue::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| error_description.and_then(classify_body))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant")
		|| value.eq_ignore_ascii_case("access_denied")
		|| value.eq_ignore_ascii_case("bad_verification_code")
	{
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
		|| value.eq_ignore_ascii_case("incorrect_client_credentials")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
		|| value.eq_ignore_ascii_case("permission_denied")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
		|| value.eq_ignore_ascii_case("unavailable")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: &str) -> Option<ProviderErrorKind> {
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: u16) -> ProviderErrorKind {
	match status {
		400 | 404 | 410 => ProviderErrorKind::InvalidGrant,
		401 => ProviderErrorKind::InvalidClient,
		403 => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}
