pub mod error;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use error::{DatabaseError, TaskError};
pub use manager::DatabaseManager;
pub use memory::MemoryTaskStore;
pub use repository::TaskRepository;
pub use store::TaskStore;
