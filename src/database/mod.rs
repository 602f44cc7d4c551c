pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryIdeaStore;
pub use models::{Idea, IdeaDraft};
pub use repository::{IdeaStore, PgIdeaStore};
