pub mod manager;
pub mod models;
pub mod pagination;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Contact, ContactInput};
pub use pagination::{ListQuery, Pagination};
pub use repository::{ContactRepository, ContactStore};
