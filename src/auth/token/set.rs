//! Token sets produced by authorization-code and refresh exchanges.

// self
use crate::{_prelude::*, auth::Secret};

/// Access/refresh token pair returned by a provider's token endpoint.
///
/// The set is handed to the caller, which owns storage. Fields a provider omits degrade to
/// defaults instead of failing: an absent `access_token` becomes the empty string, an absent
/// `expires_in` becomes `0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
	/// Access token secret; empty when the provider omitted it.
	pub access_token: Secret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Lifetime of the access token in seconds; `0` when unknown.
	pub expires_in: u64,
}
impl TokenSet {
	/// Decodes a JSON token response.
	///
	/// Bodies that are not JSON objects produce an empty set. `expires_in` is accepted as a
	/// number or a numeric string.
	pub fn from_json(body: &str) -> Self {
		match serde_json::from_str::<JsonValue>(body) {
			Ok(JsonValue::Object(document)) => Self::from_fields(|key| match document.get(key)? {
				JsonValue::String(text) => Some(text.clone()),
				JsonValue::Number(number) => Some(number.to_string()),
				_ => None,
			}),
			_ => Self::default(),
		}
	}

	/// Decodes an `application/x-www-form-urlencoded` token response.
	pub fn from_form(body: &str) -> Self {
		let pairs = url::form_urlencoded::parse(body.trim().as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();

		Self::from_fields(|key| pairs.get(key).cloned())
	}

	/// Decodes a token response whose format is not announced: JSON objects are read as JSON,
	/// anything else as a form-encoded body.
	pub fn from_body(body: &str) -> Self {
		if body.trim_start().starts_with('{') {
			Self::from_json(body)
		} else {
			Self::from_form(body)
		}
	}

	fn from_fields(get: impl Fn(&str) -> Option<String>) -> Self {
		let access_token = get("access_token").map(Secret::from).unwrap_or_default();
		let refresh_token =
			get("refresh_token").filter(|value| !value.is_empty()).map(Secret::from);
		let expires_in = get("expires_in").as_deref().and_then(parse_seconds).unwrap_or(0);

		Self { access_token, refresh_token, expires_in }
	}

	/// Carries `presented` over as the refresh token when the response did not rotate it.
	pub fn with_fallback_refresh_token(mut self, presented: &str) -> Self {
		if self.refresh_token.is_none() && !presented.is_empty() {
			self.refresh_token = Some(Secret::from(presented));
		}

		self
	}

	/// Refresh token as a plain string, empty when the provider did not issue one.
	pub fn refresh_token_or_empty(&self) -> &str {
		self.refresh_token.as_ref().map(Secret::expose).unwrap_or_default()
	}

	/// Absolute expiry relative to `issued_at`, or `None` when the lifetime is unknown.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		if self.expires_in == 0 {
			return None;
		}

		let seconds = i64::try_from(self.expires_in).ok()?;

		issued_at.checked_add(Duration::seconds(seconds))
	}
}

fn parse_seconds(raw: &str) -> Option<u64> {
	let raw = raw.trim();

	raw.parse::<u64>().ok().or_else(|| {
		raw.parse::<f64>()
			.ok()
			.filter(|value| value.is_finite() && *value >= 0.)
			.map(|value| value as u64)
	})
}
