use crate::application::loan::ServiceDependencies;
use crate::domain::{
    InvalidLoanDates,
    loan::{self, Loan},
    value_objects::{BookId, LoanId, MemberId},
};
use crate::ports::{PageRequest, Paged};
use chrono::NaiveDate;

use super::errors::{CatalogError, Result};

/// 貸出レコードの入力値
///
/// 汎用のCRUDであり、在庫数の増減や通知は行わない。
/// 貸出・返却のワークフローは `application::loan` を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanDraft {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loan_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
}

impl From<Loan> for LoanDraft {
    fn from(loan: Loan) -> Self {
        Self {
            book_id: loan.book_id,
            member_id: loan.member_id,
            loan_date: Some(loan.loan_date),
            due_date: Some(loan.due_date),
            return_date: loan.return_date,
            is_returned: loan.is_returned,
        }
    }
}

fn invalid_dates(err: InvalidLoanDates) -> CatalogError {
    match err {
        InvalidLoanDates::DueDateTooEarly { earliest } => {
            CatalogError::Invalid(format!("due_date must be on or after {}.", earliest))
        }
        InvalidLoanDates::OutOfRange => CatalogError::Invalid("loan_date is out of range.".to_string()),
    }
}

async fn build_loan(
    deps: &ServiceDependencies,
    loan_id: LoanId,
    draft: LoanDraft,
    today: NaiveDate,
) -> Result<Loan> {
    let book_exists = deps
        .books
        .get(draft.book_id)
        .await
        .map_err(CatalogError::Storage)?
        .is_some();
    if !book_exists {
        return Err(CatalogError::Invalid("Book does not exist.".to_string()));
    }

    let member_exists = deps
        .members
        .exists(draft.member_id)
        .await
        .map_err(CatalogError::Storage)?;
    if !member_exists {
        return Err(CatalogError::Invalid("Member does not exist.".to_string()));
    }

    let loan_date = draft.loan_date.unwrap_or(today);
    let due_date = match draft.due_date {
        Some(due_date) => due_date,
        None => loan::default_due_date(loan_date).map_err(invalid_dates)?,
    };

    loan::validate_dates(loan_date, due_date).map_err(invalid_dates)?;

    // 返却済みフラグと返却日は常に対で存在する
    match (draft.is_returned, draft.return_date) {
        (true, None) => {
            return Err(CatalogError::Invalid(
                "return_date is required when is_returned is true.".to_string(),
            ));
        }
        (false, Some(_)) => {
            return Err(CatalogError::Invalid(
                "return_date must be empty when is_returned is false.".to_string(),
            ));
        }
        _ => {}
    }

    if draft.return_date.is_some_and(|returned| returned < loan_date) {
        return Err(CatalogError::Invalid(
            "return_date must not be before loan_date.".to_string(),
        ));
    }

    Ok(Loan {
        loan_id,
        book_id: draft.book_id,
        member_id: draft.member_id,
        loan_date,
        due_date,
        return_date: draft.return_date,
        is_returned: draft.is_returned,
    })
}

pub async fn list_loans(deps: &ServiceDependencies, page: PageRequest) -> Result<Paged<Loan>> {
    deps.loans.list(page).await.map_err(CatalogError::Storage)
}

pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Loan> {
    deps.loans
        .get(loan_id)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or(CatalogError::NotFound("Loan"))
}

pub async fn create_loan(
    deps: &ServiceDependencies,
    draft: LoanDraft,
    today: NaiveDate,
) -> Result<Loan> {
    let loan = build_loan(deps, LoanId::new(), draft, today).await?;

    deps.loans
        .insert(&loan)
        .await
        .map_err(CatalogError::Storage)?;

    tracing::info!(loan_id = %loan.loan_id, "loan record created");
    Ok(loan)
}

pub async fn update_loan(
    deps: &ServiceDependencies,
    loan_id: LoanId,
    draft: LoanDraft,
    today: NaiveDate,
) -> Result<Loan> {
    get_loan(deps, loan_id).await?;

    let loan = build_loan(deps, loan_id, draft, today).await?;

    let updated = deps
        .loans
        .update(&loan)
        .await
        .map_err(CatalogError::Storage)?;

    if !updated {
        return Err(CatalogError::NotFound("Loan"));
    }
    Ok(loan)
}

pub async fn delete_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<()> {
    let deleted = deps
        .loans
        .delete(loan_id)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound("Loan"));
    }

    tracing::info!(loan_id = %loan_id, "loan record deleted");
    Ok(())
}
