use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, MemberId};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBook {
    pub book_id: BookId,
    /// 未指定の場合は「会員が存在しない」として扱う
    pub member_id: Option<MemberId>,
    pub loaned_on: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBook {
    pub book_id: BookId,
    pub member_id: Option<MemberId>,
    pub returned_on: NaiveDate,
}

/// コマンド：返却期限を延長する
///
/// 延長日数の検証は貸出の存在確認の後に行うため、未検証の値をそのまま運ぶ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendDueDate {
    pub loan_id: LoanId,
    pub additional_days: Option<i64>,
    pub requested_on: NaiveDate,
}
