use chrono::NaiveDate;

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLoanError {
    /// 既に返却済み
    AlreadyReturned,
}

/// 返却期限延長のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendDueDateError {
    /// 既に返却済み
    AlreadyReturned,
    /// 延滞中のため延長不可
    Overdue,
    /// 延長後の返却期限が日付の範囲を超える
    DateOutOfRange,
}

/// 貸出日と返却期限の組み合わせが不正
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidLoanDates {
    /// 返却期限が貸出期間より短い
    DueDateTooEarly { earliest: NaiveDate },
    /// 貸出日から返却期限を求めると日付の範囲を超える
    OutOfRange,
}
