pub mod manager;
pub mod paged;

pub use manager::{DatabaseError, DatabaseManager};
pub use paged::{paged_find, PageRequest, Paged};
