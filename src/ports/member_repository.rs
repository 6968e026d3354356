use crate::domain::{member::Member, value_objects::MemberId};
use async_trait::async_trait;

use super::{PageRequest, Paged, Result};

/// 貸出中の冊数を付与した会員
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMemberView {
    pub member_id: MemberId,
    pub username: String,
    pub email: String,
    pub active_loans: u64,
}

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 会員をユーザー名順に取得する
    async fn list(&self, page: PageRequest) -> Result<Paged<Member>>;

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 会員が存在するか確認する
    ///
    /// 貸出作成前の会員バリデーションに使用される。
    async fn exists(&self, member_id: MemberId) -> Result<bool>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Member>>;

    async fn insert(&self, member: &Member) -> Result<()>;

    async fn update(&self, member: &Member) -> Result<bool>;

    /// 会員を削除する。会員の貸出も連鎖して削除される。
    async fn delete(&self, member_id: MemberId) -> Result<bool>;

    /// 貸出中の冊数が多い会員を取得する
    ///
    /// 貸出中が1冊以上の会員のみ。冊数の降順、同数はユーザー名の昇順。
    async fn top_active(&self, limit: u64) -> Result<Vec<ActiveMemberView>>;
}
