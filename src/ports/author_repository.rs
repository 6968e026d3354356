use crate::domain::{catalog::Author, value_objects::AuthorId};
use async_trait::async_trait;

use super::{PageRequest, Paged, Result};

/// 著者リポジトリポート
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// 著者を姓名順に取得する
    async fn list(&self, page: PageRequest) -> Result<Paged<Author>>;

    async fn get(&self, author_id: AuthorId) -> Result<Option<Author>>;

    async fn insert(&self, author: &Author) -> Result<()>;

    /// 更新対象が存在しなかった場合は `false`
    async fn update(&self, author: &Author) -> Result<bool>;

    /// 著者を削除する。著者の書籍（とその貸出）も連鎖して削除される。
    async fn delete(&self, author_id: AuthorId) -> Result<bool>;
}
