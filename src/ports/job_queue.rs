use crate::domain::value_objects::LoanId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// バックグラウンドで実行する通知ジョブ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationJob {
    /// 貸出完了メール。実行時に貸出を解決する
    LoanConfirmation { loan_id: LoanId },
    /// 延滞通知メール。宛先と文面に必要な値はジョブ作成時に確定している
    OverdueNotice {
        member_name: String,
        book_title: String,
        member_email: String,
    },
}

impl NotificationJob {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationJob::LoanConfirmation { .. } => "loan_confirmation",
            NotificationJob::OverdueNotice { .. } => "overdue_notice",
        }
    }
}

/// ジョブ1件の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// メールを送信した
    Delivered,
    /// 対象が消えていたため何もしなかった（想定内、再送不要）
    Skipped { reason: String },
    /// 送信または参照に失敗した
    Failed { error: String },
}

/// 投入したジョブの結果を受け取るためのハンドル
///
/// 破棄してもジョブは実行される（fire-and-forget）。
#[derive(Debug)]
pub struct JobHandle {
    receiver: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub fn new(receiver: oneshot::Receiver<JobOutcome>) -> Self {
        Self { receiver }
    }

    /// 既に結果が確定しているハンドルを作る
    pub fn completed(outcome: JobOutcome) -> Self {
        let (sender, receiver) = oneshot::channel();
        // 受信側はまだ手元にあるので送信は失敗しない
        let _ = sender.send(outcome);
        Self { receiver }
    }

    /// ジョブの完了を待つ
    pub async fn outcome(self) -> JobOutcome {
        self.receiver.await.unwrap_or_else(|_| JobOutcome::Failed {
            error: "job ended without reporting an outcome".to_string(),
        })
    }
}

/// ジョブキューポート
///
/// 投入は即座に戻り、ジョブは互いに独立して実行される。実行順序は保証しない。
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: NotificationJob) -> JobHandle;
}

/// ジョブを実際に処理する側
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: NotificationJob) -> JobOutcome;
}
