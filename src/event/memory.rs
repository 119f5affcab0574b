//! Thread-safe in-memory [`JobQueue`] implementation for local development and tests.

// crates.io
use rand::Rng;
// self
use crate::{
	_prelude::*,
	event::{JobId, JobQueue, QueueError, QueueFuture},
};

type QueueMap = Arc<RwLock<HashMap<String, Vec<QueuedJob>>>>;

/// Job accepted by a [`MemoryQueue`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueuedJob {
	/// Assigned identifier.
	pub id: JobId,
	/// Worker class the job targets.
	pub class: String,
	/// Job payload.
	pub payload: JsonValue,
	/// Acceptance instant.
	#[serde(with = "time::serde::rfc3339")]
	pub enqueued_at: OffsetDateTime,
}

/// Thread-safe queue backend that keeps jobs in-process for tests and demos.
///
/// Jobs get random 32-character hex ids. With a capacity set, a full queue declines new jobs
/// (`Ok(None)`) instead of failing.
#[derive(Clone, Debug, Default)]
pub struct MemoryQueue {
	queues: QueueMap,
	capacity: Option<usize>,
}
impl MemoryQueue {
	/// Limits every named queue to `capacity` pending jobs.
	pub fn with_capacity(capacity: usize) -> Self {
		Self { capacity: Some(capacity), ..Default::default() }
	}

	/// Number of pending jobs on `queue`.
	pub fn len(&self, queue: &str) -> usize {
		self.queues.read().get(queue).map_or(0, Vec::len)
	}

	/// Returns true if `queue` has no pending jobs.
	pub fn is_empty(&self, queue: &str) -> bool {
		self.len(queue) == 0
	}

	/// Removes and returns every pending job on `queue`, oldest first.
	pub fn drain(&self, queue: &str) -> Vec<QueuedJob> {
		self.queues.write().remove(queue).unwrap_or_default()
	}

	fn enqueue_now(
		queues: QueueMap,
		capacity: Option<usize>,
		queue: &str,
		class: &str,
		payload: JsonValue,
	) -> Result<Option<JobId>, QueueError> {
		if queue.is_empty() {
			return Err(QueueError::InvalidArgument { message: "queue name is empty".into() });
		}

		let mut guard = queues.write();
		let pending = guard.entry(queue.to_owned()).or_default();

		if capacity.is_some_and(|capacity| pending.len() >= capacity) {
			return Ok(None);
		}

		let id = JobId::new(format!("{:032x}", rand::rng().random::<u128>()));

		pending.push(QueuedJob {
			id: id.clone(),
			class: class.to_owned(),
			payload,
			enqueued_at: OffsetDateTime::now_utc(),
		});

		Ok(Some(id))
	}
}
impl JobQueue for MemoryQueue {
	fn enqueue<'a>(
		&'a self,
		queue: &'a str,
		class: &'a str,
		payload: JsonValue,
	) -> QueueFuture<'a, Option<JobId>> {
		let queues = self.queues.clone();
		let capacity = self.capacity;

		Box::pin(async move { Self::enqueue_now(queues, capacity, queue, class, payload) })
	}
}
