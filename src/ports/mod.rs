pub mod author_repository;
pub mod book_repository;
pub mod job_queue;
pub mod loan_repository;
pub mod mail_transport;
pub mod member_repository;

pub use author_repository::*;
pub use book_repository::*;
pub use job_queue::*;
pub use loan_repository::*;
pub use mail_transport::*;
pub use member_repository::*;

/// ポート実装が返すエラー
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, BoxError>;

/// 一意制約違反
///
/// insert/update が一意な列（ISBN、ユーザー名）の重複で失敗した場合に返す。
/// 呼び出し側は `BoxError::downcast_ref` で判別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("duplicate {field}")]
pub struct DuplicateKey {
    pub field: &'static str,
}

/// 一覧取得の範囲指定（offset/limit）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

/// 一覧取得の結果と全件数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
