use crate::domain::{catalog::Author, value_objects::AuthorId};
use crate::ports::author_repository::AuthorRepository as AuthorRepositoryTrait;
use crate::ports::{PageRequest, Paged, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{limit_offset, to_count};

fn map_row_to_author(row: &PgRow) -> Author {
    Author {
        author_id: AuthorId::from_uuid(row.get("id")),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        biography: row.get("biography"),
    }
}

/// AuthorRepositoryのPostgreSQL実装
pub struct AuthorRepository {
    pool: PgPool,
}

impl AuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepositoryTrait for AuthorRepository {
    async fn list(&self, page: PageRequest) -> Result<Paged<Author>> {
        let (limit, offset) = limit_offset(page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, biography
            FROM authors
            ORDER BY last_name, first_name, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_row_to_author).collect(),
            total: to_count(total)?,
        })
    }

    async fn get(&self, author_id: AuthorId) -> Result<Option<Author>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, biography FROM authors WHERE id = $1",
        )
        .bind(author_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_author))
    }

    async fn insert(&self, author: &Author) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO authors (id, first_name, last_name, biography)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(author.author_id.value())
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, author: &Author) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET first_name = $2, last_name = $3, biography = $4
            WHERE id = $1
            "#,
        )
        .bind(author.author_id.value())
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 著者を削除する。書籍と貸出は外部キーの ON DELETE CASCADE で削除される
    async fn delete(&self, author_id: AuthorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(author_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
