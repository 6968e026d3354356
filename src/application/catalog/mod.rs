//! 著者・書籍・会員・貸出レコードの管理（CRUD）

mod authors;
mod books;
mod errors;
mod loans;
mod members;

pub use authors::*;
pub use books::*;
pub use errors::{CatalogError, Result};
pub use loans::*;
pub use members::*;
