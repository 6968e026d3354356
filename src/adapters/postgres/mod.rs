pub mod authors;
pub mod books;
pub mod loans;
pub mod members;

use crate::ports::{BoxError, DuplicateKey, PageRequest};

// パブリックに型を再エクスポート
pub use authors::AuthorRepository as PostgresAuthorRepository;
pub use books::BookRepository as PostgresBookRepository;
pub use loans::LoanRepository as PostgresLoanRepository;
pub use members::MemberRepository as PostgresMemberRepository;

/// 行データが想定外だった場合のエラー
fn invalid_data(message: impl Into<String>) -> BoxError {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}

/// 一意制約違反（23505）を `DuplicateKey` に変換する
fn unique_violation(err: sqlx::Error, field: &'static str) -> BoxError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => Box::new(DuplicateKey { field }),
        _ => Box::new(err),
    }
}

/// PageRequest を LIMIT/OFFSET にバインドできる値に変換する
fn limit_offset(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit).unwrap_or(i64::MAX),
        i64::try_from(page.offset).unwrap_or(i64::MAX),
    )
}

/// COUNT(*) の結果を件数に変換する
fn to_count(value: i64) -> Result<u64, BoxError> {
    u64::try_from(value).map_err(|_| invalid_data(format!("negative row count: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset_converts_page_request() {
        let page = PageRequest {
            offset: 20,
            limit: 10,
        };
        assert_eq!(limit_offset(page), (10, 20));
    }

    #[test]
    fn test_limit_offset_saturates_huge_values() {
        let page = PageRequest {
            offset: u64::MAX,
            limit: u64::MAX,
        };
        assert_eq!(limit_offset(page), (i64::MAX, i64::MAX));
    }

    #[test]
    fn test_to_count_rejects_negative() {
        assert_eq!(to_count(3).unwrap(), 3);
        assert!(to_count(-1).is_err());
    }
}
