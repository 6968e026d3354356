use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MemberId;

/// 会員 - 利用者アカウントに紐づく
///
/// 貸出ワークフローからは読み取り専用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub username: String,
    pub email: String,
    pub membership_date: NaiveDate,
}
