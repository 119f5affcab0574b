//! Certificate job events handed to an external job system.
//!
//! A [`CertificateEvent`] describes "issue or renew the certificate for this project/domain" and
//! is pushed onto the `v1-certificates` queue through any [`JobQueue`] backend. The crate ships
//! [`MemoryQueue`] for development and tests; production deployments implement [`JobQueue`] over
//! their broker of choice.

pub mod memory;

pub use memory::*;

// self
use crate::_prelude::*;

/// Queue certificate jobs are published to.
pub const CERTIFICATES_QUEUE_NAME: &str = "v1-certificates";
/// Worker class that consumes certificate jobs.
pub const CERTIFICATES_CLASS_NAME: &str = "CertificatesV1";

/// Future type returned by [`JobQueue`] operations.
pub type QueueFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, QueueError>> + 'a + Send>>;

/// Job system contract.
pub trait JobQueue
where
	Self: Send + Sync,
{
	/// Enqueues `payload` for `class` on `queue`.
	///
	/// Returns the assigned job id, or `None` when the backend declined the job without failing.
	fn enqueue<'a>(
		&'a self,
		queue: &'a str,
		class: &'a str,
		payload: JsonValue,
	) -> QueueFuture<'a, Option<JobId>>;
}

/// Error type produced by [`JobQueue`] implementations and event validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum QueueError {
	/// The event is missing data the job needs.
	#[error("Invalid job argument: {message}.")]
	InvalidArgument {
		/// Human-readable error payload.
		message: String,
	},
	/// Payload could not be encoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the queue.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Identifier a queue assigns to an accepted job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);
impl JobId {
	/// Wraps a backend-assigned identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for JobId {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for JobId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Wire payload of a certificate job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateJob {
	/// Project the certificate belongs to.
	pub project: String,
	/// Domain to issue for; `null` lets the worker pick the project's domains.
	pub domain: Option<String>,
	/// Forces issuance even when the current certificate is not due for renewal.
	pub skip_renew_check: bool,
}

/// Builder for certificate jobs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CertificateEvent {
	project: Option<String>,
	domain: Option<String>,
	skip_renew_check: bool,
}
impl CertificateEvent {
	/// Creates an event for `project` with no domain and renewal checks enabled.
	pub fn new(project: impl Into<String>) -> Self {
		Self { project: Some(project.into()), ..Default::default() }
	}

	/// Sets the domain the certificate is for.
	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());

		self
	}

	/// Sets whether the worker skips its renewal check.
	pub fn with_skip_renew_check(mut self, skip: bool) -> Self {
		self.skip_renew_check = skip;

		self
	}

	/// Replaces the project.
	pub fn set_project(&mut self, project: Option<String>) -> &mut Self {
		self.project = project;

		self
	}

	/// Replaces the domain; `None` clears it.
	pub fn set_domain(&mut self, domain: Option<String>) -> &mut Self {
		self.domain = domain;

		self
	}

	/// Replaces the skip-renewal-check flag.
	pub fn set_skip_renew_check(&mut self, skip: bool) -> &mut Self {
		self.skip_renew_check = skip;

		self
	}

	/// Project, if set.
	pub fn project(&self) -> Option<&str> {
		self.project.as_deref()
	}

	/// Domain, if set.
	pub fn domain(&self) -> Option<&str> {
		self.domain.as_deref()
	}

	/// Whether the renewal check is skipped.
	pub fn skip_renew_check(&self) -> bool {
		self.skip_renew_check
	}

	/// Builds the wire payload; fails when no project is set.
	pub fn job(&self) -> Result<CertificateJob, QueueError> {
		let project = self.project.as_deref().filter(|project| !project.is_empty()).ok_or_else(
			|| QueueError::InvalidArgument { message: "certificate event has no project".into() },
		)?;

		Ok(CertificateJob {
			project: project.to_owned(),
			domain: self.domain.clone(),
			skip_renew_check: self.skip_renew_check,
		})
	}

	/// Publishes the job to the certificates queue.
	///
	/// Returns the job id, or `None` when the queue declined the job.
	pub async fn trigger<Q>(&self, queue: &Q) -> Result<Option<JobId>>
	where
		Q: ?Sized + JobQueue,
	{
		let job = self.job()?;
		let payload = serde_json::to_value(&job)
			.map_err(|e| QueueError::Serialization { message: e.to_string() })?;
		let id = queue.enqueue(CERTIFICATES_QUEUE_NAME, CERTIFICATES_CLASS_NAME, payload).await?;

		#[cfg(feature = "tracing")]
		{
			match &id {
				Some(id) => tracing::debug!(
					queue = CERTIFICATES_QUEUE_NAME,
					job_id = %id,
					"Certificate job enqueued."
				),
				None => tracing::warn!(queue = CERTIFICATES_QUEUE_NAME, "Certificate job declined."),
			}
		}

		Ok(id)
	}
}
