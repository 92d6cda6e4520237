//! In-memory store for service and API tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::category::{Category, CategoryId, CategoryRepository};
use crate::error::StoreError;
use crate::store::{
    CommitReceipt, Page, PageRequest, PendingChange, UnitOfWork, UnitOfWorkFactory,
};
use crate::ticket::{Ticket, TicketId, TicketRepository, TicketVisibility};
use crate::user::{Email, User, UserId, UserRepository};

use super::fixtures;

#[derive(Debug, Clone, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    tickets: BTreeMap<TicketId, Ticket>,
    categories: BTreeMap<CategoryId, Category>,
    next_user_id: i64,
    next_ticket_id: i64,
}

impl State {
    fn apply(&mut self, change: PendingChange, receipt: &mut CommitReceipt) -> Result<(), StoreError> {
        match change {
            PendingChange::InsertTicket(ticket) => {
                if !self.categories.contains_key(&ticket.category_id()) {
                    return Err(StoreError::Rejected(format!(
                        "category {} does not exist",
                        ticket.category_id()
                    )));
                }
                self.next_ticket_id += 1;
                let id = TicketId(self.next_ticket_id);
                self.tickets.insert(id, ticket.with_id(id));
                receipt.ticket_ids.push(id);
            }
            PendingChange::UpdateTicket(ticket) => {
                let id = ticket
                    .id()
                    .filter(|id| self.tickets.contains_key(id))
                    .ok_or_else(|| StoreError::Rejected("ticket does not exist".to_string()))?;
                self.tickets.insert(id, ticket);
            }
            PendingChange::InsertUser(user) => {
                if self.users.values().any(|u| u.email() == user.email()) {
                    return Err(StoreError::Rejected(format!(
                        "email {} already stored",
                        user.email()
                    )));
                }
                self.next_user_id += 1;
                let id = UserId(self.next_user_id);
                self.users.insert(id, user.into_user(id));
                receipt.user_ids.push(id);
            }
            PendingChange::UpdateUser(user) => {
                if !self.users.contains_key(&user.id()) {
                    return Err(StoreError::Rejected(format!("user {} does not exist", user.id())));
                }
                self.users.insert(user.id(), user);
            }
        }
        Ok(())
    }
}

/// Store kept entirely in memory, seeded with the standard categories.
///
/// Commits can be made to fail to exercise the fatal path of the services.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    fail_commits: Arc<RwLock<bool>>,
    commits: Arc<RwLock<usize>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let categories = fixtures::standard_categories()
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        Self {
            state: Arc::new(RwLock::new(State {
                categories,
                ..State::default()
            })),
            fail_commits: Arc::new(RwLock::new(false)),
            commits: Arc::new(RwLock::new(0)),
        }
    }

    /// Store a user with a caller-chosen id.
    pub async fn add_user(&self, user: User) {
        let mut state = self.state.write().await;
        state.next_user_id = state.next_user_id.max(user.id().0);
        state.users.insert(user.id(), user);
    }

    /// Store a ticket as-is, assigning the next id.
    pub async fn add_ticket(&self, ticket: Ticket) -> TicketId {
        let mut state = self.state.write().await;
        state.next_ticket_id += 1;
        let id = TicketId(state.next_ticket_id);
        state.tickets.insert(id, ticket.with_id(id));
        id
    }

    pub async fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.state.read().await.tickets.get(&id).cloned()
    }

    pub async fn user(&self, id: UserId) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn ticket_count(&self) -> usize {
        self.state.read().await.tickets.len()
    }

    /// Make every following commit fail.
    pub async fn set_fail_commits(&self, fail: bool) {
        *self.fail_commits.write().await = fail;
    }

    /// Number of successful commits.
    pub async fn commit_count(&self) -> usize {
        *self.commits.read().await
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email() == email).cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<Page<User>, StoreError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| {
            (a.name(), a.surname(), a.id()).cmp(&(b.name(), b.surname(), b.id()))
        });
        let total = users.len() as u64;
        let items = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn get_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        Ok(self.state.read().await.tickets.get(&id).cloned())
    }

    async fn list(
        &self,
        visibility: &TicketVisibility,
        page: &PageRequest,
    ) -> Result<Page<Ticket>, StoreError> {
        let state = self.state.read().await;
        let visible: Vec<&Ticket> = state
            .tickets
            .values()
            .filter(|t| visibility.permits(t))
            .collect();
        let total = visible.len() as u64;
        let items = visible
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.state.read().await.categories.values().cloned().collect())
    }
}

impl UnitOfWorkFactory for InMemoryStore {
    fn begin(&self) -> Box<dyn UnitOfWork> {
        Box::new(InMemoryUnitOfWork {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

struct InMemoryUnitOfWork {
    store: InMemoryStore,
    pending: Vec<PendingChange>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn enqueue(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    async fn commit(&mut self) -> Result<CommitReceipt, StoreError> {
        let changes = std::mem::take(&mut self.pending);
        if *self.store.fail_commits.read().await {
            return Err(StoreError::Rejected("commit failure injected".to_string()));
        }

        let mut state = self.store.state.write().await;
        let mut next = state.clone();
        let mut receipt = CommitReceipt::default();
        for change in changes {
            next.apply(change, &mut receipt)?;
        }
        *state = next;
        drop(state);

        *self.store.commits.write().await += 1;
        Ok(receipt)
    }
}
