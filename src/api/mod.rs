pub mod error;
pub mod extract;
pub mod handlers;
pub mod pagination;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use types::*;
