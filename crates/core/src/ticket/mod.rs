//! Support tickets: the lifecycle aggregate, its errors and read models.

mod error;
mod store;
mod types;
mod views;

pub use error::TicketError;
pub use store::{TicketRepository, TicketVisibility};
pub use types::{Ticket, TicketId, TicketStatus};
pub use views::{CategoryRef, StatusRef, TicketDetails, TicketSummary};
