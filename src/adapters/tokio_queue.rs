use crate::ports::job_queue::{JobHandle, JobHandler, JobQueue, NotificationJob};
use std::sync::Arc;
use tokio::sync::oneshot;

/// tokio タスクでジョブを実行するジョブキュー
///
/// ジョブごとに独立したタスクを起動するため、1件の失敗や遅延が
/// 他のジョブに影響しない。結果は oneshot チャネルでハンドルに返す。
#[derive(Clone)]
pub struct TokioJobQueue {
    handler: Arc<dyn JobHandler>,
}

impl TokioJobQueue {
    pub fn new(handler: Arc<dyn JobHandler>) -> Self {
        Self { handler }
    }
}

impl JobQueue for TokioJobQueue {
    fn enqueue(&self, job: NotificationJob) -> JobHandle {
        let (sender, receiver) = oneshot::channel();
        let handler = Arc::clone(&self.handler);

        tracing::debug!(kind = job.kind(), "job enqueued");
        tokio::spawn(async move {
            let outcome = handler.handle(job).await;
            // ハンドルが破棄されていれば結果は捨てる
            let _ = sender.send(outcome);
        });

        JobHandle::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LoanId;
    use crate::ports::job_queue::JobOutcome;
    use async_trait::async_trait;

    struct EchoHandler;

    #[async_trait]
    impl JobHandler for EchoHandler {
        async fn handle(&self, job: NotificationJob) -> JobOutcome {
            match job {
                NotificationJob::LoanConfirmation { .. } => JobOutcome::Delivered,
                NotificationJob::OverdueNotice { member_email, .. } => JobOutcome::Failed {
                    error: format!("cannot reach {member_email}"),
                },
            }
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl JobHandler for PanickingHandler {
        async fn handle(&self, _job: NotificationJob) -> JobOutcome {
            panic!("handler crashed");
        }
    }

    #[tokio::test]
    async fn test_enqueue_reports_handler_outcome() {
        let queue = TokioJobQueue::new(Arc::new(EchoHandler));

        let delivered = queue.enqueue(NotificationJob::LoanConfirmation {
            loan_id: LoanId::new(),
        });
        let failed = queue.enqueue(NotificationJob::OverdueNotice {
            member_name: "alice".to_string(),
            book_title: "Dune".to_string(),
            member_email: "alice@example.com".to_string(),
        });

        assert_eq!(delivered.outcome().await, JobOutcome::Delivered);
        assert_eq!(
            failed.outcome().await,
            JobOutcome::Failed {
                error: "cannot reach alice@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported_as_failed() {
        let queue = TokioJobQueue::new(Arc::new(PanickingHandler));

        let handle = queue.enqueue(NotificationJob::LoanConfirmation {
            loan_id: LoanId::new(),
        });

        assert!(matches!(handle.outcome().await, JobOutcome::Failed { .. }));
    }
}
