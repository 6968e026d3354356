use crate::ports::{JobHandle, JobOutcome, JobQueue, NotificationJob};
use futures::future::join_all;

/// 一括投入したジョブの集計
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.delivered + self.skipped + self.failed
    }

    fn record(mut self, outcome: &JobOutcome) -> Self {
        match outcome {
            JobOutcome::Delivered => self.delivered += 1,
            JobOutcome::Skipped { .. } => self.skipped += 1,
            JobOutcome::Failed { .. } => self.failed += 1,
        }
        self
    }
}

/// 一括投入したジョブのハンドル群
///
/// ジョブ同士は独立しており、実行順序もない。
/// 破棄すれば fire-and-forget、`wait` すれば各ジョブの結果を集計できる。
#[derive(Debug, Default)]
pub struct NotificationBatch {
    handles: Vec<JobHandle>,
}

impl NotificationBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// すべてのジョブの完了を待って集計する
    pub async fn wait(self) -> BatchReport {
        join_all(self.handles.into_iter().map(JobHandle::outcome))
            .await
            .iter()
            .fold(BatchReport::default(), BatchReport::record)
    }
}

/// ジョブを1件ずつ独立に投入する
pub fn dispatch_batch(queue: &dyn JobQueue, jobs: Vec<NotificationJob>) -> NotificationBatch {
    NotificationBatch {
        handles: jobs.into_iter().map(|job| queue.enqueue(job)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LoanId;
    use std::sync::Mutex;

    /// 投入順に結果を返すだけのキュー
    struct ScriptedQueue {
        outcomes: Mutex<Vec<JobOutcome>>,
        received: Mutex<Vec<NotificationJob>>,
    }

    impl JobQueue for ScriptedQueue {
        fn enqueue(&self, job: NotificationJob) -> JobHandle {
            self.received.lock().unwrap().push(job);
            let outcome = self.outcomes.lock().unwrap().remove(0);
            JobHandle::completed(outcome)
        }
    }

    fn notice(name: &str) -> NotificationJob {
        NotificationJob::OverdueNotice {
            member_name: name.to_string(),
            book_title: "Dune".to_string(),
            member_email: format!("{}@example.com", name),
        }
    }

    #[tokio::test]
    async fn test_dispatch_batch_submits_one_job_each() {
        let queue = ScriptedQueue {
            outcomes: Mutex::new(vec![
                JobOutcome::Delivered,
                JobOutcome::Delivered,
                JobOutcome::Delivered,
            ]),
            received: Mutex::new(Vec::new()),
        };

        let batch = dispatch_batch(&queue, vec![notice("a"), notice("b"), notice("c")]);

        assert_eq!(batch.len(), 3);
        assert_eq!(queue.received.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_wait_reports_each_outcome_independently() {
        let queue = ScriptedQueue {
            outcomes: Mutex::new(vec![
                JobOutcome::Delivered,
                JobOutcome::Failed {
                    error: "smtp down".to_string(),
                },
                JobOutcome::Skipped {
                    reason: "gone".to_string(),
                },
                JobOutcome::Delivered,
            ]),
            received: Mutex::new(Vec::new()),
        };

        let jobs = vec![
            notice("a"),
            notice("b"),
            NotificationJob::LoanConfirmation {
                loan_id: LoanId::new(),
            },
            notice("d"),
        ];
        let report = dispatch_batch(&queue, jobs).wait().await;

        assert_eq!(
            report,
            BatchReport {
                delivered: 2,
                skipped: 1,
                failed: 1,
            }
        );
        assert_eq!(report.total(), 4);
    }

    #[tokio::test]
    async fn test_empty_batch_waits_immediately() {
        let batch = NotificationBatch::empty();
        assert!(batch.is_empty());
        assert_eq!(batch.wait().await, BatchReport::default());
    }

    #[tokio::test]
    async fn test_dropped_job_counts_as_failed() {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        drop(sender);

        let outcome = JobHandle::new(receiver).outcome().await;
        assert!(matches!(outcome, JobOutcome::Failed { .. }));
    }
}
