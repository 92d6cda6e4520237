//! Read projections returned by the ticket services.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Ticket, TicketId, TicketStatus};
use crate::category::{Category, CategoryId};
use crate::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRef {
    pub id: i64,
    pub name: String,
}

impl From<TicketStatus> for StatusRef {
    fn from(status: TicketStatus) -> Self {
        Self {
            id: status.id(),
            name: status.name().to_string(),
        }
    }
}

/// Row of a ticket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub id: TicketId,
    pub description: String,
    pub category: CategoryRef,
    pub status: StatusRef,
    pub requester_id: UserId,
    pub assignee_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Full view of a single ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketDetails {
    pub id: TicketId,
    pub description: String,
    pub category: CategoryRef,
    pub status: StatusRef,
    pub requester_id: UserId,
    pub assignee_id: Option<UserId>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated_by: Option<UserId>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

fn category_ref(ticket: &Ticket, category: Option<&Category>) -> CategoryRef {
    CategoryRef {
        id: ticket.category_id(),
        name: category.map(|c| c.name.clone()).unwrap_or_default(),
    }
}

impl TicketSummary {
    /// Build from a stored ticket. Returns `None` for a ticket without an id.
    pub fn project(ticket: &Ticket, category: Option<&Category>) -> Option<Self> {
        Some(Self {
            id: ticket.id()?,
            description: ticket.description().to_string(),
            category: category_ref(ticket, category),
            status: ticket.status().into(),
            requester_id: ticket.requester_id(),
            assignee_id: ticket.assignee_id(),
            created_at: ticket.created_at(),
        })
    }
}

impl TicketDetails {
    /// Build from a stored ticket. Returns `None` for a ticket without an id.
    pub fn project(ticket: &Ticket, category: Option<&Category>) -> Option<Self> {
        Some(Self {
            id: ticket.id()?,
            description: ticket.description().to_string(),
            category: category_ref(ticket, category),
            status: ticket.status().into(),
            requester_id: ticket.requester_id(),
            assignee_id: ticket.assignee_id(),
            completed_at: ticket.completed_at(),
            cancellation_reason: ticket.cancellation_reason().map(str::to_string),
            created_at: ticket.created_at(),
            last_updated_by: ticket.last_updated_by(),
            last_updated_at: ticket.last_updated_at(),
        })
    }
}
