//! In-memory implementation of every repository port.
//!
//! All four repositories share one lock, so the check-and-update steps of
//! `open_loan` and `close_loan` are atomic here just as they are inside a
//! PostgreSQL transaction.

mod authors;
mod books;
mod loans;
mod members;

use crate::domain::{
    catalog::{Author, Book},
    loan::Loan,
    member::Member,
    value_objects::{AuthorId, BookId, LoanId, MemberId},
};
use crate::ports::{PageRequest, Paged, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    authors: HashMap<AuthorId, Author>,
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
    loans: HashMap<LoanId, Loan>,
}

impl State {
    fn remove_book_cascade(&mut self, book_id: BookId) -> bool {
        let removed = self.books.remove(&book_id).is_some();
        if removed {
            self.loans.retain(|_, loan| loan.book_id != book_id);
        }
        removed
    }
}

/// Shared in-memory library store
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".into())
    }

    /// Current copy count of a book, for tests and diagnostics
    pub fn available_copies(&self, book_id: BookId) -> Option<i32> {
        self.state
            .lock()
            .ok()?
            .books
            .get(&book_id)
            .map(|book| book.available_copies)
    }

    /// Number of stored loans, returned or not
    pub fn loan_count(&self) -> usize {
        self.state.lock().map(|state| state.loans.len()).unwrap_or(0)
    }
}

/// Sort a snapshot and cut the requested page out of it
fn paginate<T, K: Ord>(mut items: Vec<T>, page: PageRequest, key: impl FnMut(&T) -> K) -> Paged<T> {
    items.sort_by_key(key);
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect();
    Paged { items, total }
}
