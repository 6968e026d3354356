use crate::ports::BoxError;
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
///
/// 表示文言はクライアントにそのまま返される。
#[derive(Debug, Error)]
pub enum LendingError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 在庫がない
    #[error("No available copies.")]
    NoAvailableCopies,

    /// 会員が存在しない
    #[error("Member does not exist.")]
    MemberNotFound,

    /// 書籍と会員の組に対する貸出中の貸出がない
    #[error("Active loan does not exist.")]
    ActiveLoanNotFound,

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// 延長日数が未指定または0以下
    #[error("Incorrect additional number of days provided")]
    InvalidExtensionDays,

    /// 延滞中のため延長不可
    #[error("Loan is overdue")]
    LoanOverdue,

    /// 貸出日から返却期限を求められない
    #[error("Loan date is out of range.")]
    LoanDateOutOfRange,

    /// 返却済みのため延長不可
    #[error("Loan is already returned")]
    LoanAlreadyReturned,

    /// 書籍リポジトリのエラー
    #[error("Book store error")]
    BookStoreError(#[source] BoxError),

    /// 会員リポジトリのエラー
    #[error("Member store error")]
    MemberStoreError(#[source] BoxError),

    /// 貸出リポジトリのエラー
    #[error("Loan store error")]
    LoanStoreError(#[source] BoxError),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingError>;
