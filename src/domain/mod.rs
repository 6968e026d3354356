pub mod catalog;
pub mod commands;
pub mod errors;
pub mod loan;
pub mod member;
pub mod notification;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
