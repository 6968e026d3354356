use serde::{Deserialize, Serialize};

use super::{AuthorId, BookId, Genre};

/// 新規書籍の既定在庫数
pub const DEFAULT_AVAILABLE_COPIES: i32 = 1;

/// 著者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
}

impl Author {
    /// 表示名（名 姓）
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 書籍
///
/// 不変条件：available_copies は負にならない。
/// 貸出・返却による増減はリポジトリの原子的な更新で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub isbn: String,
    pub genre: Genre,
    pub available_copies: i32,
}

impl Book {
    pub fn has_available_copy(&self) -> bool {
        self.available_copies >= 1
    }
}
