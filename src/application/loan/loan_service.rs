use crate::domain::{
    self, ExtendDueDateError, ExtensionDays, commands::*, loan::Loan,
    value_objects::{BookId, MemberId},
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{LendingError, Result};

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各ユースケース関数に明示的に渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub job_queue: Arc<dyn JobQueue>,
}

async fn require_book(deps: &ServiceDependencies, book_id: BookId) -> Result<BookView> {
    deps.books
        .get(book_id)
        .await
        .map_err(LendingError::BookStoreError)?
        .ok_or(LendingError::BookNotFound)
}

async fn require_member(deps: &ServiceDependencies, member_id: Option<MemberId>) -> Result<MemberId> {
    let member_id = member_id.ok_or(LendingError::MemberNotFound)?;

    let exists = deps
        .members
        .exists(member_id)
        .await
        .map_err(LendingError::MemberStoreError)?;

    if !exists {
        return Err(LendingError::MemberNotFound);
    }
    Ok(member_id)
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 在庫が1冊以上あること
/// - 会員が存在すること
///
/// 成功すると在庫を1冊減らして貸出を記録し、貸出完了メールのジョブを投入する。
/// メール送信の完了は待たない。
///
/// 在庫の確認はここで一度行うが、確定は `LoanRepository::open_loan` の
/// 原子的な更新による。確認後に他の貸出が最後の1冊を取った場合も
/// `NoAvailableCopies` になる。
pub async fn loan_book(deps: &ServiceDependencies, cmd: LoanBook) -> Result<Loan> {
    // 1. 書籍の存在と在庫の確認
    let book = require_book(deps, cmd.book_id).await?.book;

    if !book.has_available_copy() {
        return Err(LendingError::NoAvailableCopies);
    }

    // 2. 会員の存在確認
    let member_id = require_member(deps, cmd.member_id).await?;

    // 3. ドメイン層の純粋関数で貸出を生成
    let loan = domain::loan::open_loan(book.book_id, member_id, cmd.loaned_on)
        .map_err(|_| LendingError::LoanDateOutOfRange)?;

    // 4. 在庫の確保と貸出の記録（原子的）
    match deps
        .loans
        .open_loan(&loan)
        .await
        .map_err(LendingError::LoanStoreError)?
    {
        CheckoutOutcome::Opened => {}
        CheckoutOutcome::NoCopyAvailable => {
            tracing::warn!(
                book_id = %book.book_id,
                member_id = %member_id,
                "last copy was taken by a concurrent loan"
            );
            return Err(LendingError::NoAvailableCopies);
        }
    }

    tracing::info!(
        loan_id = %loan.loan_id,
        book_id = %loan.book_id,
        member_id = %loan.member_id,
        due_date = %loan.due_date,
        "book loaned"
    );

    // 5. 貸出完了メール（結果は待たない）
    let _ = deps.job_queue.enqueue(NotificationJob::LoanConfirmation {
        loan_id: loan.loan_id,
    });

    Ok(loan)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 書籍と会員の組に貸出中の貸出があること
/// - 延滞していても返却は受け付ける
///
/// 成功すると貸出を返却済みにし、在庫を1冊戻す。通知は送らない。
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<Loan> {
    let book = require_book(deps, cmd.book_id).await?.book;

    let member_id = cmd.member_id.ok_or(LendingError::ActiveLoanNotFound)?;

    let loan = deps
        .loans
        .find_active(book.book_id, member_id)
        .await
        .map_err(LendingError::LoanStoreError)?
        .ok_or(LendingError::ActiveLoanNotFound)?;

    let returned = domain::loan::return_loan(&loan, cmd.returned_on)
        .map_err(|_| LendingError::ActiveLoanNotFound)?;

    // 並行する返却に先を越された場合は保存されない
    let closed = deps
        .loans
        .close_loan(&returned)
        .await
        .map_err(LendingError::LoanStoreError)?;

    if !closed {
        return Err(LendingError::ActiveLoanNotFound);
    }

    tracing::info!(
        loan_id = %returned.loan_id,
        book_id = %returned.book_id,
        member_id = %returned.member_id,
        "book returned"
    );

    Ok(returned)
}

/// 返却期限を延長する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 延長日数が1日以上であること
/// - 延滞中・返却済みでないこと
///
/// 返却期限のみを更新し、更新後の貸出を返す。
pub async fn extend_due_date(deps: &ServiceDependencies, cmd: ExtendDueDate) -> Result<Loan> {
    // 1. 貸出の存在確認
    let loan = deps
        .loans
        .get(cmd.loan_id)
        .await
        .map_err(LendingError::LoanStoreError)?
        .ok_or(LendingError::LoanNotFound)?;

    // 2. 延長日数の検証
    let days = cmd
        .additional_days
        .ok_or(LendingError::InvalidExtensionDays)
        .and_then(|d| ExtensionDays::try_from(d).map_err(|_| LendingError::InvalidExtensionDays))?;

    // 3. ドメイン層の純粋関数を呼び出し
    let extended =
        domain::loan::extend_due_date(&loan, days, cmd.requested_on).map_err(|e| match e {
            ExtendDueDateError::Overdue => LendingError::LoanOverdue,
            ExtendDueDateError::AlreadyReturned => LendingError::LoanAlreadyReturned,
            ExtendDueDateError::DateOutOfRange => LendingError::InvalidExtensionDays,
        })?;

    // 4. 返却期限のみ保存
    let updated = deps
        .loans
        .update_due_date(extended.loan_id, extended.due_date)
        .await
        .map_err(LendingError::LoanStoreError)?;

    if !updated {
        return Err(LendingError::LoanNotFound);
    }

    tracing::info!(
        loan_id = %extended.loan_id,
        old_due_date = %loan.due_date,
        new_due_date = %extended.due_date,
        "due date extended"
    );

    Ok(extended)
}
