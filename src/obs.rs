//! Optional observability helpers for provider calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_identity.call` with the `provider`
//!   and `call` fields, plus a `warn` event carrying the status of every failed call.
//! - Enable `metrics` to increment the `oauth2_identity_call_total` counter for every
//!   attempt/success/failure, labeled by `provider`, `call`, and `outcome`.
//!
//! Neither layer ever records response bodies, tokens, or credentials.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Authorization URL construction (local, no network).
	LoginUrl,
	/// Authorization code exchanged at the token endpoint.
	TokenExchange,
	/// Refresh token exchanged at the token endpoint.
	TokenRefresh,
	/// Identity claim fetched from the userinfo endpoint.
	UserInfo,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::LoginUrl => "login_url",
			CallKind::TokenExchange => "token_exchange",
			CallKind::TokenRefresh => "token_refresh",
			CallKind::UserInfo => "user_info",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a provider call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `call` inside a provider span and records its attempt and outcome.
pub async fn observe<T, Fut>(provider: &str, kind: CallKind, call: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(provider, kind);

	record_call_outcome(provider, kind, CallOutcome::Attempt);

	let result = span.instrument(call).await;

	match &result {
		Ok(_) => record_call_outcome(provider, kind, CallOutcome::Success),
		Err(err) => {
			record_call_failure(provider, kind, err);
			record_call_outcome(provider, kind, CallOutcome::Failure);
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ProviderRequestError;

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe("google", CallKind::UserInfo, async { Ok::<_, Error>(7) }).await;

		assert_eq!(ok.ok(), Some(7));

		let err = observe("google", CallKind::TokenExchange, async {
			Err::<(), _>(Error::from(ProviderRequestError::from_response(502, "bad gateway")))
		})
		.await
		.expect_err("Failures must propagate unchanged.");

		assert_eq!(err.as_provider().map(|inner| inner.status), Some(502));
	}

	#[test]
	fn labels_are_stable() {
		assert_eq!(CallKind::TokenRefresh.to_string(), "token_refresh");
		assert_eq!(CallOutcome::Failure.to_string(), "failure");
	}
}
