//! Ticket categories and their priorities.

mod store;
mod types;

pub use store::CategoryRepository;
pub use types::{Category, CategoryError, CategoryId, Priority, PriorityId};
