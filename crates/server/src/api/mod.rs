pub mod catalog;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod tickets;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
