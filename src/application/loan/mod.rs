mod errors;
mod loan_service;
mod overdue_scan;

pub use errors::{LendingError, Result};
pub use loan_service::{ServiceDependencies, extend_due_date, loan_book, return_book};
pub use overdue_scan::check_overdue_loans;
