use thiserror::Error;

use crate::error::ErrorKind;

/// Ticket errors raised by the aggregate and the ticket services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("The ticket with the specified identifier was not found.")]
    NotFound,

    #[error("The current user does not have permission to view this ticket.")]
    CannotBeViewedByThisUser,

    #[error("The ticket can only be updated by the user who requested it.")]
    CannotBeUpdatedByThisUser,

    #[error("The ticket cannot be assigned to this user.")]
    CannotBeAssignedToThisUser,

    #[error("The current user is not allowed to assign this ticket.")]
    CannotBeAssignedByThisUser,

    #[error("The current user is not allowed to cancel this ticket.")]
    CannotBeCancelledByThisUser,

    #[error("The ticket can only be completed by the analyst assigned to it.")]
    CannotBeCompletedByThisUser,

    #[error("The ticket status can only be changed by the analyst assigned to it.")]
    StatusCannotBeChangedByThisUser,

    #[error("The description is required.")]
    DescriptionIsRequired,

    #[error("The cancellation reason is required.")]
    CancellationReasonIsRequired,

    #[error("The ticket has not been assigned to a user.")]
    HasNotBeenAssignedToAUser,

    #[error("The ticket has already been completed or cancelled.")]
    HasAlreadyBeenCompletedOrCancelled,

    #[error("The ticket status cannot be changed to new.")]
    CannotChangeStatusToNew,

    #[error("The ticket cannot be moved to the specified status.")]
    StatusNotAllowed,

    #[error("The specified status does not exist.")]
    StatusDoesNotExist,
}

impl TicketError {
    pub fn code(&self) -> &'static str {
        match self {
            TicketError::NotFound => "Ticket.NotFound",
            TicketError::CannotBeViewedByThisUser => "Ticket.CannotBeViewedByThisUser",
            TicketError::CannotBeUpdatedByThisUser => "Ticket.CannotBeUpdatedByThisUser",
            TicketError::CannotBeAssignedToThisUser => "Ticket.CannotBeAssignedToThisUser",
            TicketError::CannotBeAssignedByThisUser => "Ticket.CannotBeAssignedByThisUser",
            TicketError::CannotBeCancelledByThisUser => "Ticket.CannotBeCancelledByThisUser",
            TicketError::CannotBeCompletedByThisUser => "Ticket.CannotBeCompletedByThisUser",
            TicketError::StatusCannotBeChangedByThisUser => "Ticket.StatusCannotBeChangedByThisUser",
            TicketError::DescriptionIsRequired => "Ticket.DescriptionIsRequired",
            TicketError::CancellationReasonIsRequired => "Ticket.CancellationReasonIsRequired",
            TicketError::HasNotBeenAssignedToAUser => "Ticket.HasNotBeenAssignedToAUser",
            TicketError::HasAlreadyBeenCompletedOrCancelled => {
                "Ticket.HasAlreadyBeenCompletedOrCancelled"
            }
            TicketError::CannotChangeStatusToNew => "Ticket.CannotChangeStatusToNew",
            TicketError::StatusNotAllowed => "Ticket.StatusNotAllowed",
            TicketError::StatusDoesNotExist => "Ticket.StatusDoesNotExist",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TicketError::NotFound => ErrorKind::NotFound,
            TicketError::CannotBeViewedByThisUser
            | TicketError::CannotBeUpdatedByThisUser
            | TicketError::CannotBeAssignedToThisUser
            | TicketError::CannotBeAssignedByThisUser
            | TicketError::CannotBeCancelledByThisUser
            | TicketError::CannotBeCompletedByThisUser
            | TicketError::StatusCannotBeChangedByThisUser => ErrorKind::InvalidPermission,
            TicketError::DescriptionIsRequired
            | TicketError::CancellationReasonIsRequired
            | TicketError::HasNotBeenAssignedToAUser
            | TicketError::HasAlreadyBeenCompletedOrCancelled
            | TicketError::CannotChangeStatusToNew
            | TicketError::StatusNotAllowed
            | TicketError::StatusDoesNotExist => ErrorKind::BusinessRule,
        }
    }
}
