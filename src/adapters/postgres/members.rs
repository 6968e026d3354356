use crate::domain::{member::Member, value_objects::MemberId};
use crate::ports::member_repository::MemberRepository as MemberRepositoryTrait;
use crate::ports::{ActiveMemberView, PageRequest, Paged, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{limit_offset, to_count, unique_violation};

fn map_row_to_member(row: &PgRow) -> Member {
    Member {
        member_id: MemberId::from_uuid(row.get("id")),
        username: row.get("username"),
        email: row.get("email"),
        membership_date: row.get("membership_date"),
    }
}

/// MemberRepositoryのPostgreSQL実装
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn list(&self, page: PageRequest) -> Result<Paged<Member>> {
        let (limit, offset) = limit_offset(page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, username, email, membership_date
            FROM members
            ORDER BY username, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_row_to_member).collect(),
            total: to_count(total)?,
        })
    }

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            "SELECT id, username, email, membership_date FROM members WHERE id = $1",
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_member))
    }

    async fn exists(&self, member_id: MemberId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM members WHERE id = $1)")
            .bind(member_id.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Member>> {
        let row = sqlx::query(
            "SELECT id, username, email, membership_date FROM members WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_member))
    }

    async fn insert(&self, member: &Member) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO members (id, username, email, membership_date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.username)
        .bind(&member.email)
        .bind(member.membership_date)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "username"))?;

        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET username = $2, email = $3, membership_date = $4
            WHERE id = $1
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.username)
        .bind(&member.email)
        .bind(member.membership_date)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "username"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 貸出中の冊数で会員を集計する
    ///
    /// INNER JOIN のため貸出中が0冊の会員は含まれない。
    async fn top_active(&self, limit: u64) -> Result<Vec<ActiveMemberView>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.username, m.email, COUNT(l.id) AS active_loans
            FROM members m
            JOIN loans l ON l.member_id = m.id AND l.is_returned = FALSE
            GROUP BY m.id, m.username, m.email
            ORDER BY active_loans DESC, m.username ASC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ActiveMemberView> {
                Ok(ActiveMemberView {
                    member_id: MemberId::from_uuid(row.get("id")),
                    username: row.get("username"),
                    email: row.get("email"),
                    active_loans: to_count(row.get("active_loans"))?,
                })
            })
            .collect()
    }
}
