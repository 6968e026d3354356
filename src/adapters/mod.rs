pub mod mail;
pub mod memory;
pub mod mock;
pub mod postgres;
pub mod tokio_queue;

pub use memory::InMemoryStore;
pub use tokio_queue::TokioJobQueue;
