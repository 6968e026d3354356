use crate::domain::{catalog::Book, value_objects::BookId};
use async_trait::async_trait;

use super::{PageRequest, Paged, Result};

/// 書籍ビュー
///
/// 一覧・詳細表示用に著者の表示名を結合したもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub book: Book,
    pub author_name: String,
}

/// 書籍リポジトリポート
///
/// 在庫数（available_copies）の増減はここでは扱わない。
/// 貸出・返却に伴う在庫操作は `LoanRepository` が貸出レコードと同時に原子的に行う。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍をタイトル順に取得する
    async fn list(&self, page: PageRequest) -> Result<Paged<BookView>>;

    async fn get(&self, book_id: BookId) -> Result<Option<BookView>>;

    /// ISBNで書籍を検索する（重複チェック用）
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    async fn insert(&self, book: &Book) -> Result<()>;

    async fn update(&self, book: &Book) -> Result<bool>;

    async fn delete(&self, book_id: BookId) -> Result<bool>;
}
