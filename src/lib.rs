//! Provider-agnostic OAuth 2.0 login client: authorization-code exchange, token refresh, and
//! identity claims behind a single error channel for every provider call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod event;
pub mod http;
pub mod obs;
pub mod provider;
#[cfg(test)]
pub(crate) mod _preludet {
	//! Convenience re-exports and an in-process stub transport for unit tests.

	pub use crate::_prelude::*;

	// std
	use std::{collections::VecDeque, convert::Infallible};
	// self
	use crate::http::{HttpTransport, ProviderRequest, ProviderResponse, TransportFuture};

	/// Transport that replays canned responses and records every request it receives.
	#[derive(Clone, Debug, Default)]
	pub struct StubTransport {
		responses: Arc<Mutex<VecDeque<ProviderResponse>>>,
		requests: Arc<Mutex<Vec<ProviderRequest>>>,
	}
	impl StubTransport {
		/// Queues a response; responses are served in FIFO order and the last one repeats.
		pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
			self.responses.lock().push_back(ProviderResponse { status, body: body.into() });

			self
		}

		/// Requests observed so far.
		pub fn requests(&self) -> Vec<ProviderRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpTransport for StubTransport {
		type TransportError = Infallible;

		fn execute(&self, request: ProviderRequest) -> TransportFuture<'_, Self::TransportError> {
			let responses = self.responses.clone();

			self.requests.lock().push(request);

			Box::pin(async move {
				let mut queue = responses.lock();
				let response = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };

				Ok(response.unwrap_or(ProviderResponse { status: 200, body: String::new() }))
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use oauth2::http::{HeaderMap, HeaderValue, Method, header};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
