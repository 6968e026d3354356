use crate::application::notification::{NotificationBatch, dispatch_batch};
use crate::ports::NotificationJob;
use chrono::NaiveDate;

use super::errors::{LendingError, Result};
use super::loan_service::ServiceDependencies;

/// 延滞チェックバッチ
///
/// 毎日定刻に実行され、延滞している貸出ごとに延滞通知ジョブを1件ずつ投入する。
///
/// ビジネスルール：
/// - 返却されておらず、返却期限 < today の貸出を延滞とする
/// - 延滞がなければ何もしない（ジョブを1件も投入しない）
///
/// 処理フロー：
/// 1. 延滞している貸出を（会員名・書籍名・メールアドレス付きで）取得
/// 2. 各貸出について延滞通知ジョブを作成
/// 3. 順序保証なしで一括投入
///
/// 戻り値のバッチは破棄してよい。ジョブは互いに独立しており、
/// 1件の失敗が他に影響することはない。
pub async fn check_overdue_loans(
    deps: &ServiceDependencies,
    today: NaiveDate,
) -> Result<NotificationBatch> {
    let overdue = deps
        .loans
        .find_overdue(today)
        .await
        .map_err(LendingError::LoanStoreError)?;

    if overdue.is_empty() {
        tracing::info!(%today, "no overdue loans");
        return Ok(NotificationBatch::empty());
    }

    let jobs = overdue
        .into_iter()
        .map(|loan| NotificationJob::OverdueNotice {
            member_name: loan.member_name,
            book_title: loan.book_title,
            member_email: loan.member_email,
        })
        .collect();

    let batch = dispatch_batch(deps.job_queue.as_ref(), jobs);

    tracing::info!(%today, dispatched = batch.len(), "overdue notices dispatched");

    Ok(batch)
}
