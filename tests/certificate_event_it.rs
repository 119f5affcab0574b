// std
use std::sync::{Arc, Mutex};
// self
use oauth2_identity::{
	error::Error,
	event::{
		CERTIFICATES_CLASS_NAME, CERTIFICATES_QUEUE_NAME, CertificateEvent, JobId, JobQueue,
		MemoryQueue, QueueError, QueueFuture,
	},
	serde_json::{Value, json},
};

/// Backend that records every job and accepts until `limit` is reached.
#[derive(Clone, Default)]
struct RecordingQueue {
	jobs: Arc<Mutex<Vec<(String, String, Value)>>>,
	limit: usize,
}
impl JobQueue for RecordingQueue {
	fn enqueue<'a>(
		&'a self,
		queue: &'a str,
		class: &'a str,
		payload: Value,
	) -> QueueFuture<'a, Option<JobId>> {
		Box::pin(async move {
			let mut jobs = self
				.jobs
				.lock()
				.map_err(|e| QueueError::Backend { message: e.to_string() })?;

			if jobs.len() >= self.limit {
				return Ok(None);
			}

			jobs.push((queue.to_owned(), class.to_owned(), payload));

			Ok(Some(JobId::new(format!("job-{}", jobs.len()))))
		})
	}
}

/// Backend that is always down.
struct BrokenQueue;
impl JobQueue for BrokenQueue {
	fn enqueue<'a>(
		&'a self,
		_queue: &'a str,
		_class: &'a str,
		_payload: Value,
	) -> QueueFuture<'a, Option<JobId>> {
		Box::pin(async { Err(QueueError::Backend { message: "connection refused".into() }) })
	}
}

#[tokio::test]
async fn custom_backends_receive_the_certificate_job() {
	let queue = RecordingQueue { limit: 1, ..Default::default() };
	let mut event = CertificateEvent::new("project-1");

	event.set_domain(Some("console.example.com".into())).set_skip_renew_check(true);

	let id = event.trigger(&queue).await.expect("Trigger should succeed.");

	assert_eq!(id, Some(JobId::new("job-1")));

	let jobs = queue.jobs.lock().expect("Recording lock should not be poisoned.").clone();

	assert_eq!(jobs.len(), 1);
	assert_eq!(jobs[0].0, CERTIFICATES_QUEUE_NAME);
	assert_eq!(jobs[0].1, CERTIFICATES_CLASS_NAME);
	assert_eq!(
		jobs[0].2,
		json!({ "project": "project-1", "domain": "console.example.com", "skipRenewCheck": true })
	);

	let declined = event.trigger(&queue).await.expect("Declining is not an error.");

	assert!(declined.is_none());
}

#[tokio::test]
async fn backend_failures_surface_as_queue_errors() {
	let err = CertificateEvent::new("project-1")
		.trigger(&BrokenQueue)
		.await
		.expect_err("A failing backend must surface its error.");

	assert!(matches!(err, Error::Queue(QueueError::Backend { .. })));
}

#[tokio::test]
async fn trait_objects_are_accepted() {
	let queue: Arc<dyn JobQueue> = Arc::new(MemoryQueue::default());
	let id = CertificateEvent::new("project-2")
		.trigger(queue.as_ref())
		.await
		.expect("Trigger should succeed.");

	assert!(id.is_some());
}
