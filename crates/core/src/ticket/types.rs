//! Ticket aggregate and its lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TicketError;
use crate::category::{Category, CategoryId};
use crate::user::{Role, User, UserId};

/// Surrogate ticket identifier, assigned by the store on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub i64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    Assigned,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::New,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
        TicketStatus::OnHold,
        TicketStatus::Completed,
        TicketStatus::Cancelled,
    ];

    /// Targets reachable through [`Ticket::change_status`].
    pub const CHANGEABLE_TARGETS: [TicketStatus; 3] = [
        TicketStatus::InProgress,
        TicketStatus::OnHold,
        TicketStatus::Completed,
    ];

    /// Stable numeric id, as persisted and exposed over the API.
    pub fn id(&self) -> i64 {
        match self {
            TicketStatus::New => 1,
            TicketStatus::Assigned => 2,
            TicketStatus::InProgress => 3,
            TicketStatus::OnHold => 4,
            TicketStatus::Completed => 5,
            TicketStatus::Cancelled => 6,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        TicketStatus::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::Assigned => "Assigned",
            TicketStatus::InProgress => "In progress",
            TicketStatus::OnHold => "On hold",
            TicketStatus::Completed => "Completed",
            TicketStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed and Cancelled tickets accept no further changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A support ticket.
///
/// Every mutation goes through one of the lifecycle methods below. A method
/// either applies its change and stamps the audit fields, or returns an error
/// and leaves the ticket untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) id: Option<TicketId>,
    pub(crate) category_id: CategoryId,
    pub(crate) status: TicketStatus,
    pub(crate) requester_id: UserId,
    pub(crate) assignee_id: Option<UserId>,
    pub(crate) description: String,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) cancellation_reason: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_updated_by: Option<UserId>,
    pub(crate) last_updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Open a new ticket on behalf of `requester`.
    pub fn create(
        category: &Category,
        description: &str,
        requester: &User,
    ) -> Result<Self, TicketError> {
        let description = required(description, TicketError::DescriptionIsRequired)?;

        Ok(Self {
            id: None,
            category_id: category.id,
            status: TicketStatus::New,
            requester_id: requester.id(),
            assignee_id: None,
            description,
            completed_at: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            last_updated_by: None,
            last_updated_at: None,
        })
    }

    /// Change category and description. Only the requester may do this.
    pub fn update(
        &mut self,
        category: &Category,
        description: &str,
        performer: &User,
    ) -> Result<(), TicketError> {
        if performer.id() != self.requester_id {
            return Err(TicketError::CannotBeUpdatedByThisUser);
        }
        self.ensure_open()?;
        let description = required(description, TicketError::DescriptionIsRequired)?;

        self.category_id = category.id;
        self.description = description;
        self.stamp(performer);
        Ok(())
    }

    /// Assign the ticket to an analyst.
    ///
    /// An analyst may claim an unassigned ticket for themselves; once assigned,
    /// only the current assignee or an administrator may hand it over.
    pub fn assign_to(&mut self, assignee: &User, performer: &User) -> Result<(), TicketError> {
        if assignee.role() != Role::Analyst {
            return Err(TicketError::CannotBeAssignedToThisUser);
        }
        if performer.role() == Role::General {
            return Err(TicketError::CannotBeAssignedByThisUser);
        }
        self.ensure_open()?;

        let is_admin = performer.role() == Role::Administrator;
        if self.status == TicketStatus::New {
            if performer.id() != assignee.id() && !is_admin {
                return Err(TicketError::CannotBeAssignedByThisUser);
            }
        } else if Some(performer.id()) != self.assignee_id && !is_admin {
            return Err(TicketError::CannotBeAssignedByThisUser);
        }

        self.assignee_id = Some(assignee.id());
        self.status = TicketStatus::Assigned;
        self.stamp(performer);
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str, performer: &User) -> Result<(), TicketError> {
        match performer.role() {
            Role::General if performer.id() != self.requester_id => {
                return Err(TicketError::CannotBeCancelledByThisUser);
            }
            Role::Analyst
                if Some(performer.id()) != self.assignee_id
                    && performer.id() != self.requester_id =>
            {
                return Err(TicketError::CannotBeCancelledByThisUser);
            }
            _ => {}
        }
        let reason = required(reason, TicketError::CancellationReasonIsRequired)?;
        self.ensure_open()?;

        self.cancellation_reason = Some(reason);
        self.status = TicketStatus::Cancelled;
        self.stamp(performer);
        Ok(())
    }

    pub fn complete(&mut self, performer: &User) -> Result<(), TicketError> {
        self.ensure_may_progress(performer, TicketError::CannotBeCompletedByThisUser)?;
        if self.status == TicketStatus::New {
            return Err(TicketError::HasNotBeenAssignedToAUser);
        }
        self.ensure_open()?;

        self.finish(performer);
        Ok(())
    }

    /// Move an assigned ticket between InProgress, OnHold and Completed.
    ///
    /// Guards run in order: performer permission, target New, terminal
    /// status, allowed target. After those, a ticket still in New is refused
    /// with [`TicketError::HasNotBeenAssignedToAUser`], the same way
    /// [`Ticket::complete`] refuses it, so status never moves off New
    /// without an assignment. Moving to Completed also stamps
    /// `completed_at`.
    pub fn change_status(
        &mut self,
        target: TicketStatus,
        performer: &User,
    ) -> Result<(), TicketError> {
        self.ensure_may_progress(performer, TicketError::StatusCannotBeChangedByThisUser)?;
        if target == TicketStatus::New {
            return Err(TicketError::CannotChangeStatusToNew);
        }
        self.ensure_open()?;
        if !TicketStatus::CHANGEABLE_TARGETS.contains(&target) {
            return Err(TicketError::StatusNotAllowed);
        }
        if self.status == TicketStatus::New {
            return Err(TicketError::HasNotBeenAssignedToAUser);
        }

        if target == TicketStatus::Completed {
            self.finish(performer);
        } else {
            self.status = target;
            self.stamp(performer);
        }
        Ok(())
    }

    /// Whether `user` may see this ticket.
    pub fn is_visible_to(&self, user: &User) -> bool {
        match user.role() {
            Role::Administrator => true,
            Role::Analyst => {
                self.requester_id == user.id()
                    || self.assignee_id.is_none()
                    || self.assignee_id == Some(user.id())
            }
            Role::General => self.requester_id == user.id(),
        }
    }

    // Administrators are unrestricted; analysts must be the assignee.
    fn ensure_may_progress(&self, performer: &User, denied: TicketError) -> Result<(), TicketError> {
        match performer.role() {
            Role::General => Err(denied),
            Role::Analyst if self.assignee_id != Some(performer.id()) => Err(denied),
            _ => Ok(()),
        }
    }

    fn ensure_open(&self) -> Result<(), TicketError> {
        if self.status.is_terminal() {
            return Err(TicketError::HasAlreadyBeenCompletedOrCancelled);
        }
        Ok(())
    }

    fn finish(&mut self, performer: &User) {
        let now = Utc::now();
        self.completed_at = Some(now);
        self.status = TicketStatus::Completed;
        self.last_updated_by = Some(performer.id());
        self.last_updated_at = Some(now);
    }

    fn stamp(&mut self, performer: &User) {
        self.last_updated_by = Some(performer.id());
        self.last_updated_at = Some(Utc::now());
    }

    pub fn id(&self) -> Option<TicketId> {
        self.id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    pub fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated_by(&self) -> Option<UserId> {
        self.last_updated_by
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    pub(crate) fn with_id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }
}

fn required(value: &str, err: TicketError) -> Result<String, TicketError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(err);
    }
    Ok(value.to_string())
}
