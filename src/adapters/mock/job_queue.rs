use crate::ports::job_queue::{JobHandle, JobOutcome, JobQueue as JobQueueTrait, NotificationJob};
use std::sync::Mutex;

/// Mock implementation of JobQueue
///
/// Stores enqueued jobs without running them.
/// Every handle resolves immediately to `JobOutcome::Delivered`.
pub struct JobQueue {
    jobs: Mutex<Vec<NotificationJob>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Jobs enqueued so far, in enqueue order
    pub fn jobs(&self) -> Vec<NotificationJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueueTrait for JobQueue {
    fn enqueue(&self, job: NotificationJob) -> JobHandle {
        self.jobs.lock().unwrap().push(job);
        JobHandle::completed(JobOutcome::Delivered)
    }
}
