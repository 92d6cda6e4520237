//! Persistence collaborators: paging, units of work and the concrete stores.

mod page;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

pub use page::{Page, PageRequest, MAX_PAGE_SIZE};
pub use sqlite::SqliteStore;

use crate::category::CategoryRepository;
use crate::error::StoreError;
use crate::ticket::{Ticket, TicketId, TicketRepository};
use crate::user::{NewUser, User, UserId, UserRepository};

/// A change queued on a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    InsertTicket(Ticket),
    UpdateTicket(Ticket),
    InsertUser(NewUser),
    UpdateUser(User),
}

/// Ids assigned to inserted aggregates, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    pub ticket_ids: Vec<TicketId>,
    pub user_ids: Vec<UserId>,
}

/// Collects changes for one use case and applies them atomically.
///
/// Nothing reaches storage before [`UnitOfWork::commit`]. Dropping a unit of
/// work discards whatever it queued.
#[async_trait]
pub trait UnitOfWork: Send {
    fn enqueue(&mut self, change: PendingChange);

    fn insert_ticket(&mut self, ticket: Ticket) {
        self.enqueue(PendingChange::InsertTicket(ticket));
    }

    fn update_ticket(&mut self, ticket: Ticket) {
        self.enqueue(PendingChange::UpdateTicket(ticket));
    }

    fn insert_user(&mut self, user: NewUser) {
        self.enqueue(PendingChange::InsertUser(user));
    }

    fn update_user(&mut self, user: User) {
        self.enqueue(PendingChange::UpdateUser(user));
    }

    /// Apply every queued change or none of them.
    async fn commit(&mut self) -> Result<CommitReceipt, StoreError>;
}

/// Opens units of work.
pub trait UnitOfWorkFactory: Send + Sync {
    fn begin(&self) -> Box<dyn UnitOfWork>;
}

/// The collaborators a service needs, behind trait objects.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub units: Arc<dyn UnitOfWorkFactory>,
}

impl Collaborators {
    /// Use one store for every role.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + TicketRepository + CategoryRepository + UnitOfWorkFactory + 'static,
    {
        Self {
            users: store.clone(),
            tickets: store.clone(),
            categories: store.clone(),
            units: store,
        }
    }
}
