use crate::domain::{
    loan::Loan,
    value_objects::{BookId, LoanId, MemberId},
};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use crate::ports::{
    CheckoutOutcome, LoanNotificationView, OverdueLoanView, PageRequest, Paged, Result,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{limit_offset, to_count};

const LOAN_COLUMNS: &str =
    "id, book_id, member_id, loan_date, due_date, return_date, is_returned";

fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        loan_id: LoanId::from_uuid(row.get("id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        loan_date: row.get("loan_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
        is_returned: row.get("is_returned"),
    }
}

/// LoanRepositoryのPostgreSQL実装
///
/// 在庫数の増減を伴う操作（貸出開始・返却）は、書籍行の条件付き更新と
/// 貸出行の変更を1つのトランザクションで行う。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn list(&self, page: PageRequest) -> Result<Paged<Loan>> {
        let (limit, offset) = limit_offset(page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans ORDER BY loan_date DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_row_to_loan).collect(),
            total: to_count(total)?,
        })
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"))
            .bind(loan_id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn insert(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, book_id, member_id, loan_date, due_date, return_date, is_returned)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.book_id.value())
        .bind(loan.member_id.value())
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.is_returned)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, loan: &Loan) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET book_id = $2, member_id = $3, loan_date = $4, due_date = $5,
                return_date = $6, is_returned = $7
            WHERE id = $1
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.book_id.value())
        .bind(loan.member_id.value())
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.is_returned)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 在庫の確保と貸出の挿入を1トランザクションで行う
    ///
    /// `available_copies > 0` を条件にした UPDATE が0行なら在庫切れとして
    /// ロールバックする。行ロックにより最後の1冊を二重に貸し出すことはない。
    async fn open_loan(&self, loan: &Loan) -> Result<CheckoutOutcome> {
        let mut tx = self.pool.begin().await?;

        let reserved = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            "#,
        )
        .bind(loan.book_id.value())
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(CheckoutOutcome::NoCopyAvailable);
        }

        sqlx::query(
            r#"
            INSERT INTO loans (id, book_id, member_id, loan_date, due_date, return_date, is_returned)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.book_id.value())
        .bind(loan.member_id.value())
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.is_returned)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CheckoutOutcome::Opened)
    }

    async fn find_active(&self, book_id: BookId, member_id: MemberId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE book_id = $1 AND member_id = $2 AND is_returned = FALSE
            ORDER BY loan_date, id
            LIMIT 1
            "#
        ))
        .bind(book_id.value())
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    /// 貸出を返却済みにし、在庫を1冊戻す
    ///
    /// 既に返却済みなら UPDATE が0行となり、在庫は変更しない。
    async fn close_loan(&self, loan: &Loan) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query(
            r#"
            UPDATE loans
            SET is_returned = TRUE, return_date = $2
            WHERE id = $1 AND is_returned = FALSE
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.return_date)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = $1")
            .bind(loan.book_id.value())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn update_due_date(&self, loan_id: LoanId, due_date: NaiveDate) -> Result<bool> {
        let result = sqlx::query("UPDATE loans SET due_date = $2 WHERE id = $1")
            .bind(loan_id.value())
            .bind(due_date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<OverdueLoanView>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.due_date, m.username, m.email, b.title
            FROM loans l
            JOIN members m ON m.id = l.member_id
            JOIN books b ON b.id = l.book_id
            WHERE l.is_returned = FALSE AND l.due_date < $1
            ORDER BY l.due_date, l.id
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| OverdueLoanView {
                loan_id: LoanId::from_uuid(row.get("id")),
                member_name: row.get("username"),
                member_email: row.get("email"),
                book_title: row.get("title"),
                due_date: row.get("due_date"),
            })
            .collect())
    }

    async fn notification_details(&self, loan_id: LoanId) -> Result<Option<LoanNotificationView>> {
        let row = sqlx::query(
            r#"
            SELECT l.id, m.username, m.email, b.title
            FROM loans l
            JOIN members m ON m.id = l.member_id
            JOIN books b ON b.id = l.book_id
            WHERE l.id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| LoanNotificationView {
            loan_id: LoanId::from_uuid(row.get("id")),
            member_username: row.get("username"),
            member_email: row.get("email"),
            book_title: row.get("title"),
        }))
    }
}
