use crate::domain::{
    loan::Loan,
    value_objects::{BookId, LoanId, MemberId},
};
use crate::ports::{
    CheckoutOutcome, LoanNotificationView, LoanRepository, OverdueLoanView, PageRequest, Paged,
    Result,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Reverse;

use super::{InMemoryStore, paginate};

#[async_trait]
impl LoanRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Paged<Loan>> {
        let loans = self.state()?.loans.values().cloned().collect();
        Ok(paginate(loans, page, |l: &Loan| {
            (Reverse(l.loan_date), l.loan_id)
        }))
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.state()?.loans.get(&loan_id).cloned())
    }

    async fn insert(&self, loan: &Loan) -> Result<()> {
        self.state()?.loans.insert(loan.loan_id, loan.clone());
        Ok(())
    }

    async fn update(&self, loan: &Loan) -> Result<bool> {
        let mut state = self.state()?;
        match state.loans.get_mut(&loan.loan_id) {
            Some(stored) => {
                *stored = loan.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        Ok(self.state()?.loans.remove(&loan_id).is_some())
    }

    async fn open_loan(&self, loan: &Loan) -> Result<CheckoutOutcome> {
        let mut state = self.state()?;

        let Some(book) = state.books.get_mut(&loan.book_id) else {
            return Err(format!("book {} does not exist", loan.book_id).into());
        };
        if book.available_copies < 1 {
            return Ok(CheckoutOutcome::NoCopyAvailable);
        }
        book.available_copies -= 1;

        state.loans.insert(loan.loan_id, loan.clone());
        Ok(CheckoutOutcome::Opened)
    }

    async fn find_active(&self, book_id: BookId, member_id: MemberId) -> Result<Option<Loan>> {
        Ok(self
            .state()?
            .loans
            .values()
            .filter(|l| l.book_id == book_id && l.member_id == member_id && !l.is_returned)
            .min_by_key(|l| (l.loan_date, l.loan_id))
            .cloned())
    }

    async fn close_loan(&self, loan: &Loan) -> Result<bool> {
        let mut state = self.state()?;

        match state.loans.get_mut(&loan.loan_id) {
            Some(stored) if !stored.is_returned => {
                stored.is_returned = true;
                stored.return_date = loan.return_date;
            }
            _ => return Ok(false),
        }

        if let Some(book) = state.books.get_mut(&loan.book_id) {
            book.available_copies += 1;
        }
        Ok(true)
    }

    async fn update_due_date(&self, loan_id: LoanId, due_date: NaiveDate) -> Result<bool> {
        let mut state = self.state()?;
        match state.loans.get_mut(&loan_id) {
            Some(loan) => {
                loan.due_date = due_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<OverdueLoanView>> {
        let state = self.state()?;

        let mut overdue: Vec<OverdueLoanView> = state
            .loans
            .values()
            .filter(|loan| !loan.is_returned && loan.due_date < today)
            .filter_map(|loan| {
                let member = state.members.get(&loan.member_id)?;
                let book = state.books.get(&loan.book_id)?;
                Some(OverdueLoanView {
                    loan_id: loan.loan_id,
                    member_name: member.username.clone(),
                    member_email: member.email.clone(),
                    book_title: book.title.clone(),
                    due_date: loan.due_date,
                })
            })
            .collect();
        overdue.sort_by_key(|view| (view.due_date, view.loan_id));
        Ok(overdue)
    }

    async fn notification_details(&self, loan_id: LoanId) -> Result<Option<LoanNotificationView>> {
        let state = self.state()?;

        let details = state.loans.get(&loan_id).and_then(|loan| {
            let member = state.members.get(&loan.member_id)?;
            let book = state.books.get(&loan.book_id)?;
            Some(LoanNotificationView {
                loan_id,
                member_username: member.username.clone(),
                member_email: member.email.clone(),
                book_title: book.title.clone(),
            })
        });
        Ok(details)
    }
}
