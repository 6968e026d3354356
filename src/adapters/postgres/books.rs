use crate::domain::{
    catalog::Book,
    value_objects::{AuthorId, BookId, Genre},
};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::{BookView, PageRequest, Paged, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

use super::{invalid_data, limit_offset, to_count, unique_violation};

const BOOK_COLUMNS: &str = "b.id, b.title, b.author_id, b.isbn, b.genre, b.available_copies";

/// PostgreSQLの行データをBookに変換する
///
/// genre 列の文字列が既知のジャンルでない場合はエラーを返す。
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let genre_str: &str = row.get("genre");
    let genre = Genre::from_str(genre_str).map_err(invalid_data)?;

    Ok(Book {
        book_id: BookId::from_uuid(row.get("id")),
        title: row.get("title"),
        author_id: AuthorId::from_uuid(row.get("author_id")),
        isbn: row.get("isbn"),
        genre,
        available_copies: row.get("available_copies"),
    })
}

fn map_row_to_view(row: &PgRow) -> Result<BookView> {
    Ok(BookView {
        book: map_row_to_book(row)?,
        author_name: row.get("author_name"),
    })
}

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn list(&self, page: PageRequest) -> Result<Paged<BookView>> {
        let (limit, offset) = limit_offset(page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOK_COLUMNS}, a.first_name || ' ' || a.last_name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title, b.id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let items = rows.iter().map(map_row_to_view).collect::<Result<Vec<_>>>()?;
        Ok(Paged {
            items,
            total: to_count(total)?,
        })
    }

    async fn get(&self, book_id: BookId) -> Result<Option<BookView>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {BOOK_COLUMNS}, a.first_name || ' ' || a.last_name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#
        ))
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_view).transpose()
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.isbn = $1"))
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, isbn, genre, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(book.author_id.value())
        .bind(&book.isbn)
        .bind(book.genre.as_str())
        .bind(book.available_copies)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "isbn"))?;

        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, isbn = $4, genre = $5, available_copies = $6
            WHERE id = $1
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(book.author_id.value())
        .bind(&book.isbn)
        .bind(book.genre.as_str())
        .bind(book.available_copies)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "isbn"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
