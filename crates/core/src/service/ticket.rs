//! Ticket use cases.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{load_category, load_user};
use crate::error::{ServiceError, StoreError};
use crate::store::{Collaborators, Page, PageRequest};
use crate::ticket::{
    Ticket, TicketDetails, TicketError, TicketId, TicketStatus, TicketSummary, TicketVisibility,
};
use crate::category::CategoryId;
use crate::user::{User, UserId};

/// Orchestrates the ticket lifecycle.
///
/// Each use case loads the acting user, then the entities it references,
/// delegates to exactly one aggregate operation and commits one unit of work.
#[derive(Clone)]
pub struct TicketService {
    collaborators: Collaborators,
}

impl TicketService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    async fn load_ticket(&self, id: TicketId) -> Result<Ticket, ServiceError> {
        self.collaborators
            .tickets
            .get_by_id(id)
            .await?
            .ok_or_else(|| TicketError::NotFound.into())
    }

    /// Run one transition and commit it.
    async fn commit_transition(
        &self,
        operation: &'static str,
        actor: &User,
        mut ticket: Ticket,
        transition: impl FnOnce(&mut Ticket) -> Result<(), TicketError>,
    ) -> Result<Ticket, ServiceError> {
        let ticket_id = ticket.id();
        transition(&mut ticket).inspect_err(|e| {
            warn!(
                ticket_id = ?ticket_id,
                performer_id = %actor.id(),
                operation,
                code = e.code(),
                "Ticket transition denied"
            );
        })?;

        let mut uow = self.collaborators.units.begin();
        uow.update_ticket(ticket.clone());
        uow.commit().await?;

        info!(
            ticket_id = ?ticket_id,
            performer_id = %actor.id(),
            operation,
            status = %ticket.status(),
            "Ticket updated"
        );
        Ok(ticket)
    }

    pub async fn create_ticket(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        description: &str,
    ) -> Result<TicketId, ServiceError> {
        let requester = load_user(&self.collaborators, user_id).await?;
        let category = load_category(&self.collaborators, category_id).await?;

        let ticket = Ticket::create(&category, description, &requester).inspect_err(|e| {
            warn!(performer_id = %user_id, code = e.code(), "Ticket creation rejected");
        })?;

        let mut uow = self.collaborators.units.begin();
        uow.insert_ticket(ticket);
        let receipt = uow.commit().await?;
        let ticket_id = receipt.ticket_ids.first().copied().ok_or_else(|| {
            StoreError::Rejected("commit returned no ticket id".to_string())
        })?;

        info!(
            ticket_id = %ticket_id,
            performer_id = %user_id,
            category_id = %category_id,
            "Ticket created"
        );
        Ok(ticket_id)
    }

    pub async fn update_ticket(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
        category_id: CategoryId,
        description: &str,
    ) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;
        let category = load_category(&self.collaborators, category_id).await?;

        self.commit_transition("update", &actor, ticket, |t| {
            t.update(&category, description, &actor)
        })
        .await?;
        Ok(())
    }

    pub async fn assign_to(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
        assignee_id: UserId,
    ) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;
        let assignee = load_user(&self.collaborators, assignee_id).await?;

        self.commit_transition("assign", &actor, ticket, |t| t.assign_to(&assignee, &actor))
            .await?;
        Ok(())
    }

    /// Claim a ticket for the acting user.
    pub async fn assign_to_me(&self, user_id: UserId, ticket_id: TicketId) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;

        self.commit_transition("assign", &actor, ticket, |t| t.assign_to(&actor, &actor))
            .await?;
        Ok(())
    }

    pub async fn cancel_ticket(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
        reason: &str,
    ) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;

        self.commit_transition("cancel", &actor, ticket, |t| t.cancel(reason, &actor))
            .await?;
        Ok(())
    }

    pub async fn complete_ticket(&self, user_id: UserId, ticket_id: TicketId) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;

        self.commit_transition("complete", &actor, ticket, |t| t.complete(&actor))
            .await?;
        Ok(())
    }

    /// Move a ticket to the status with the given numeric id.
    pub async fn change_status(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
        status_id: i64,
    ) -> Result<(), ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;
        let target = TicketStatus::from_id(status_id).ok_or(TicketError::StatusDoesNotExist)?;

        self.commit_transition("change_status", &actor, ticket, |t| {
            t.change_status(target, &actor)
        })
        .await?;
        Ok(())
    }

    pub async fn get_ticket_by_id(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
    ) -> Result<TicketDetails, ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let ticket = self.load_ticket(ticket_id).await?;

        if !ticket.is_visible_to(&actor) {
            warn!(ticket_id = %ticket_id, performer_id = %user_id, "Ticket read denied");
            return Err(TicketError::CannotBeViewedByThisUser.into());
        }

        let category = self
            .collaborators
            .categories
            .get_by_id(ticket.category_id())
            .await?;
        debug!(ticket_id = %ticket_id, performer_id = %user_id, "Ticket read");

        TicketDetails::project(&ticket, category.as_ref())
            .ok_or_else(|| StoreError::Rejected(format!("ticket {} has no id", ticket_id)).into())
    }

    /// List the tickets the acting user may see.
    pub async fn get_tickets(
        &self,
        user_id: UserId,
        page: i64,
        page_size: i64,
    ) -> Result<Page<TicketSummary>, ServiceError> {
        let actor = load_user(&self.collaborators, user_id).await?;
        let request = PageRequest::new(page, page_size);
        let visibility = TicketVisibility::for_user(&actor);

        let tickets = self.collaborators.tickets.list(&visibility, &request).await?;
        let categories: HashMap<_, _> = self
            .collaborators
            .categories
            .list_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        debug!(
            performer_id = %user_id,
            role = %actor.role(),
            total = tickets.total_count,
            "Tickets listed"
        );
        Ok(tickets.filter_map(|t| TicketSummary::project(&t, categories.get(&t.category_id()))))
    }
}
