// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used around provider calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provider name and call kind.
	pub fn new(provider: &str, kind: CallKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_identity.call", provider, call = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (provider, kind);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> CallSpanGuard {
		#[cfg(feature = "tracing")]
		{
			CallSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			CallSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`CallSpan::entered`].
pub struct CallSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for CallSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CallSpanGuard(..)")
	}
}

/// Logs a failed call; only the status and error class are recorded, never the body.
pub fn record_call_failure(provider: &str, kind: CallKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		match error.as_provider() {
			Some(err) => tracing::warn!(
				provider,
				call = kind.as_str(),
				status = err.status,
				class = ?err.kind(),
				"Provider call failed."
			),
			None => tracing::warn!(provider, call = kind.as_str(), "Provider call failed locally."),
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (provider, kind, error);
	}
}

/// Logs the status of a completed HTTP exchange at `debug` level.
pub fn record_response_status(method: &Method, url: &Url, status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			method = %method,
			host = url.host_str().unwrap_or_default(),
			path = url.path(),
			status,
			"Provider responded."
		);
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, url, status);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn call_span_noop_without_tracing() {
		let _guard = CallSpan::new("google", CallKind::LoginUrl).entered();
		// Compile-time smoke test ensures the guard exists even when tracing is disabled.
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new("github", CallKind::UserInfo);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
