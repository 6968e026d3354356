pub mod catalog;
pub mod loan;
pub mod notification;
