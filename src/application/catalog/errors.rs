use crate::ports::{BoxError, DuplicateKey};
use thiserror::Error;

/// 蔵書・会員管理（CRUD）のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 指定されたIDのリソースが存在しない
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 入力が不正（参照先が存在しない、一意制約違反など）
    #[error("{0}")]
    Invalid(String),

    /// リポジトリのエラー
    #[error("Storage error")]
    Storage(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// 保存時のエラーを変換する。一意制約違反は入力エラーとして `message` を返す。
pub(super) fn storage_error(err: BoxError, message: &str) -> CatalogError {
    if err.downcast_ref::<DuplicateKey>().is_some() {
        CatalogError::Invalid(message.to_string())
    } else {
        CatalogError::Storage(err)
    }
}
