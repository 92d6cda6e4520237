//! Ticket repository trait and the listing visibility rule.

use async_trait::async_trait;

use super::{Ticket, TicketId};
use crate::error::StoreError;
use crate::store::{Page, PageRequest};
use crate::user::{Role, User, UserId};

/// Which tickets a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketVisibility {
    /// Every ticket.
    All,
    /// Tickets requested by the user.
    RequestedBy(UserId),
    /// Tickets requested by or assigned to the user, plus unassigned ones.
    ParticipantOrUnassigned(UserId),
}

impl TicketVisibility {
    pub fn for_user(user: &User) -> Self {
        match user.role() {
            Role::Administrator => TicketVisibility::All,
            Role::Analyst => TicketVisibility::ParticipantOrUnassigned(user.id()),
            Role::General => TicketVisibility::RequestedBy(user.id()),
        }
    }

    pub fn permits(&self, ticket: &Ticket) -> bool {
        match self {
            TicketVisibility::All => true,
            TicketVisibility::RequestedBy(id) => ticket.requester_id() == *id,
            TicketVisibility::ParticipantOrUnassigned(id) => {
                ticket.requester_id() == *id
                    || ticket.assignee_id().is_none()
                    || ticket.assignee_id() == Some(*id)
            }
        }
    }
}

/// Read access to tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn get_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Visible tickets ordered by id, with the total count of the filter.
    async fn list(
        &self,
        visibility: &TicketVisibility,
        page: &PageRequest,
    ) -> Result<Page<Ticket>, StoreError>;
}
