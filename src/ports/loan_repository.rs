use crate::domain::{
    loan::Loan,
    value_objects::{BookId, LoanId, MemberId},
};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{PageRequest, Paged, Result};

/// 延滞通知に必要な情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueLoanView {
    pub loan_id: LoanId,
    pub member_name: String,
    pub member_email: String,
    pub book_title: String,
    pub due_date: NaiveDate,
}

/// 貸出完了通知に必要な情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanNotificationView {
    pub loan_id: LoanId,
    pub member_username: String,
    pub member_email: String,
    pub book_title: String,
}

/// 貸出開始の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// 在庫を1冊確保し、貸出を記録した
    Opened,
    /// 在庫がなかった。何も変更していない
    NoCopyAvailable,
}

/// 貸出リポジトリポート
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を貸出日の新しい順に取得する
    async fn list(&self, page: PageRequest) -> Result<Paged<Loan>>;

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 貸出レコードをそのまま保存する（在庫数は変更しない）
    async fn insert(&self, loan: &Loan) -> Result<()>;

    /// 貸出レコードをそのまま上書きする（在庫数は変更しない）
    async fn update(&self, loan: &Loan) -> Result<bool>;

    async fn delete(&self, loan_id: LoanId) -> Result<bool>;

    /// 在庫を1冊確保して貸出を記録する
    ///
    /// 「在庫が1以上なら1減らす」と貸出の挿入を1つの原子的な操作として行う。
    /// 並行する貸出が最後の1冊を取り合っても在庫は負にならない。
    async fn open_loan(&self, loan: &Loan) -> Result<CheckoutOutcome>;

    /// 書籍と会員の組に対する貸出中の貸出を検索する
    async fn find_active(&self, book_id: BookId, member_id: MemberId) -> Result<Option<Loan>>;

    /// 返却済みにした貸出を保存し、在庫を1冊戻す
    ///
    /// 保存済みの貸出が既に返却済みだった場合は何も変更せず `false` を返す。
    async fn close_loan(&self, loan: &Loan) -> Result<bool>;

    /// 返却期限のみを更新する
    async fn update_due_date(&self, loan_id: LoanId, due_date: NaiveDate) -> Result<bool>;

    /// 延滞している貸出を検索する
    ///
    /// 返却されておらず、返却期限 < today の貸出を返す。
    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<OverdueLoanView>>;

    /// 通知用に会員と書籍の情報を結合して取得する
    async fn notification_details(&self, loan_id: LoanId) -> Result<Option<LoanNotificationView>>;
}
