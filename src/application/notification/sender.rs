use crate::domain::{notification, value_objects::LoanId};
use crate::ports::{
    BoxError, JobHandler, JobOutcome, LoanRepository, MailTransport, NotificationJob,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 通知ジョブの依存関係
#[derive(Clone)]
pub struct NotificationDependencies {
    pub loans: Arc<dyn LoanRepository>,
    pub mail: Arc<dyn MailTransport>,
}

/// 送信処理の正常系の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// メールを1通送信した
    Sent,
    /// 貸出が既に存在しなかったため何もしなかった
    LoanVanished,
}

/// 通知ジョブのエラー
///
/// 「対象が消えた」はエラーではなく `SendOutcome::LoanVanished` で表す。
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 貸出の参照に失敗した
    #[error("Failed to look up loan")]
    Lookup(#[source] BoxError),

    /// メール送信に失敗した
    #[error("Failed to deliver email")]
    Delivery(#[source] BoxError),
}

/// 貸出完了メールを送信する
///
/// 貸出が既に存在しない場合は何も送らずに成功する。
/// メール送信の失敗は握りつぶさずに返す（再送はしない）。
pub async fn send_loan_notification(
    deps: &NotificationDependencies,
    loan_id: LoanId,
) -> Result<SendOutcome, NotificationError> {
    let Some(details) = deps
        .loans
        .notification_details(loan_id)
        .await
        .map_err(NotificationError::Lookup)?
    else {
        return Ok(SendOutcome::LoanVanished);
    };

    let email = notification::loan_confirmation(
        &details.member_username,
        &details.member_email,
        &details.book_title,
    );

    deps.mail
        .send(&email)
        .await
        .map_err(NotificationError::Delivery)?;

    Ok(SendOutcome::Sent)
}

/// 延滞通知メールを送信する
pub async fn send_overdue_notice(
    deps: &NotificationDependencies,
    member_name: &str,
    book_title: &str,
    member_email: &str,
) -> Result<SendOutcome, NotificationError> {
    let email = notification::overdue_notice(member_name, member_email, book_title);

    deps.mail
        .send(&email)
        .await
        .map_err(NotificationError::Delivery)?;

    Ok(SendOutcome::Sent)
}

fn describe(err: &NotificationError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{}: {}", err, source),
        None => err.to_string(),
    }
}

/// ジョブキューから渡された通知ジョブを処理する
pub struct NotificationWorker {
    deps: NotificationDependencies,
}

impl NotificationWorker {
    pub fn new(deps: NotificationDependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl JobHandler for NotificationWorker {
    async fn handle(&self, job: NotificationJob) -> JobOutcome {
        let kind = job.kind();

        let result = match &job {
            NotificationJob::LoanConfirmation { loan_id } => {
                send_loan_notification(&self.deps, *loan_id).await
            }
            NotificationJob::OverdueNotice {
                member_name,
                book_title,
                member_email,
            } => send_overdue_notice(&self.deps, member_name, book_title, member_email).await,
        };

        match result {
            Ok(SendOutcome::Sent) => {
                tracing::debug!(job = kind, "notification sent");
                JobOutcome::Delivered
            }
            Ok(SendOutcome::LoanVanished) => {
                tracing::debug!(job = kind, "loan no longer exists, nothing to send");
                JobOutcome::Skipped {
                    reason: "loan no longer exists".to_string(),
                }
            }
            Err(e) => {
                let error = describe(&e);
                tracing::error!(job = kind, error = %error, "notification job failed");
                JobOutcome::Failed { error }
            }
        }
    }
}
