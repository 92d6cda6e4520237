use serde::Serialize;

use crate::error::ServiceError;
use crate::ticket::{TicketError, TicketStatus};

/// A status as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub id: i64,
    pub name: String,
    pub is_terminal: bool,
}

impl From<TicketStatus> for StatusView {
    fn from(status: TicketStatus) -> Self {
        Self {
            id: status.id(),
            name: status.name().to_string(),
            is_terminal: status.is_terminal(),
        }
    }
}

/// The status catalogue. Statuses are fixed, so no store is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketStatusService;

impl TicketStatusService {
    pub fn get_statuses(&self) -> Vec<StatusView> {
        TicketStatus::ALL.into_iter().map(StatusView::from).collect()
    }

    pub fn get_status_by_id(&self, id: i64) -> Result<StatusView, ServiceError> {
        TicketStatus::from_id(id)
            .map(StatusView::from)
            .ok_or_else(|| TicketError::StatusDoesNotExist.into())
    }
}
