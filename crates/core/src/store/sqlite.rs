//! SQLite-backed store implementing every repository and the unit of work.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::{CommitReceipt, Page, PageRequest, PendingChange, UnitOfWork, UnitOfWorkFactory};
use crate::category::{Category, CategoryId, CategoryRepository, Priority, PriorityId};
use crate::error::StoreError;
use crate::ticket::{Ticket, TicketId, TicketRepository, TicketStatus, TicketVisibility};
use crate::user::{Email, Role, User, UserId, UserRepository};

const TICKET_COLUMNS: &str = "id, category_id, status_id, requester_id, assignee_id, description, \
     completed_at, cancellation_reason, created_at, last_updated_by, last_updated_at";

const USER_COLUMNS: &str =
    "id, role_id, name, surname, email, password_hash, created_at, last_updated_at";

/// SQLite store. Cloning shares the connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::initialize_schema(&conn)?;
        Self::seed_reference_data(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS priorities (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                sla_hours INTEGER NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                priority_id INTEGER NOT NULL REFERENCES priorities(id),
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                surname TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_updated_at TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                status_id INTEGER NOT NULL,
                requester_id INTEGER NOT NULL REFERENCES users(id),
                assignee_id INTEGER REFERENCES users(id),
                description TEXT NOT NULL,
                completed_at TEXT,
                cancellation_reason TEXT,
                created_at TEXT NOT NULL,
                last_updated_by INTEGER REFERENCES users(id),
                last_updated_at TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_requester ON tickets(requester_id);
            CREATE INDEX IF NOT EXISTS idx_tickets_assignee ON tickets(assignee_id);
            CREATE INDEX IF NOT EXISTS idx_users_name ON users(name, surname);
            "#,
        )?;
        Ok(())
    }

    fn seed_reference_data(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            INSERT OR IGNORE INTO priorities (id, name, sla_hours) VALUES
                (1, 'Low', 48),
                (2, 'Medium', 24),
                (3, 'High', 8),
                (4, 'Critical', 4);

            INSERT OR IGNORE INTO categories (id, name, description, priority_id) VALUES
                (1, 'Unavailability', 'A system or service is unavailable.', 4),
                (2, 'Slowness', 'A system or service is slower than usual.', 3),
                (3, 'Request', 'A request for access, equipment or software.', 2),
                (4, 'Question', 'A question about a system or procedure.', 1);
            "#,
        )?;
        Ok(())
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))?;
        f(&mut conn)
    }

    fn build_where_clause(
        visibility: &TicketVisibility,
    ) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = vec!["is_deleted = 0"];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match visibility {
            TicketVisibility::All => {}
            TicketVisibility::RequestedBy(user_id) => {
                conditions.push("requester_id = ?");
                params.push(Box::new(user_id.0));
            }
            TicketVisibility::ParticipantOrUnassigned(user_id) => {
                conditions.push("(requester_id = ? OR assignee_id = ? OR assignee_id IS NULL)");
                params.push(Box::new(user_id.0));
                params.push(Box::new(user_id.0));
            }
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let status_id: i64 = row.get(2)?;
        let status = TicketStatus::from_id(status_id).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Integer,
                format!("unknown ticket status {}", status_id).into(),
            )
        })?;

        Ok(Ticket {
            id: Some(TicketId(row.get(0)?)),
            category_id: CategoryId(row.get(1)?),
            status,
            requester_id: UserId(row.get(3)?),
            assignee_id: row.get::<_, Option<i64>>(4)?.map(UserId),
            description: row.get(5)?,
            completed_at: optional_time(row, 6)?,
            cancellation_reason: row.get(7)?,
            created_at: time(row, 8)?,
            last_updated_by: row.get::<_, Option<i64>>(9)?.map(UserId),
            last_updated_at: optional_time(row, 10)?,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_id: i64 = row.get(1)?;
        let role = Role::from_id(role_id).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Integer,
                format!("unknown role {}", role_id).into(),
            )
        })?;

        Ok(User::restore(
            UserId(row.get(0)?),
            role,
            row.get(2)?,
            row.get(3)?,
            Email::from_trusted(row.get(4)?),
            row.get(5)?,
            time(row, 6)?,
            optional_time(row, 7)?,
        ))
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: CategoryId(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            priority: Priority {
                id: PriorityId(row.get(3)?),
                name: row.get(4)?,
                sla_hours: row.get(5)?,
            },
        })
    }

    fn apply(
        tx: &Transaction<'_>,
        change: PendingChange,
        receipt: &mut CommitReceipt,
    ) -> Result<(), StoreError> {
        match change {
            PendingChange::InsertTicket(ticket) => {
                tx.execute(
                    "INSERT INTO tickets (category_id, status_id, requester_id, assignee_id, description, completed_at, cancellation_reason, created_at, last_updated_by, last_updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        ticket.category_id.0,
                        ticket.status.id(),
                        ticket.requester_id.0,
                        ticket.assignee_id.map(|id| id.0),
                        ticket.description,
                        ticket.completed_at.map(|t| t.to_rfc3339()),
                        ticket.cancellation_reason,
                        ticket.created_at.to_rfc3339(),
                        ticket.last_updated_by.map(|id| id.0),
                        ticket.last_updated_at.map(|t| t.to_rfc3339()),
                    ],
                )?;
                receipt.ticket_ids.push(TicketId(tx.last_insert_rowid()));
            }
            PendingChange::UpdateTicket(ticket) => {
                let id = ticket.id.ok_or_else(|| {
                    StoreError::Rejected("cannot update a ticket that was never stored".to_string())
                })?;
                let updated = tx.execute(
                    "UPDATE tickets SET category_id = ?, status_id = ?, assignee_id = ?, description = ?, completed_at = ?, cancellation_reason = ?, last_updated_by = ?, last_updated_at = ? WHERE id = ? AND is_deleted = 0",
                    params![
                        ticket.category_id.0,
                        ticket.status.id(),
                        ticket.assignee_id.map(|id| id.0),
                        ticket.description,
                        ticket.completed_at.map(|t| t.to_rfc3339()),
                        ticket.cancellation_reason,
                        ticket.last_updated_by.map(|id| id.0),
                        ticket.last_updated_at.map(|t| t.to_rfc3339()),
                        id.0,
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::Rejected(format!("ticket {} does not exist", id)));
                }
            }
            PendingChange::InsertUser(user) => {
                tx.execute(
                    "INSERT INTO users (role_id, name, surname, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        user.role.id(),
                        user.name,
                        user.surname,
                        user.email.as_str(),
                        user.password_hash,
                        user.created_at.to_rfc3339(),
                    ],
                )?;
                receipt.user_ids.push(UserId(tx.last_insert_rowid()));
            }
            PendingChange::UpdateUser(user) => {
                let updated = tx.execute(
                    "UPDATE users SET name = ?, surname = ?, password_hash = ?, last_updated_at = ? WHERE id = ? AND is_deleted = 0",
                    params![
                        user.name,
                        user.surname,
                        user.password_hash,
                        user.last_updated_at.map(|t| t.to_rfc3339()),
                        user.id.0,
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::Rejected(format!("user {} does not exist", user.id)));
                }
            }
        }
        Ok(())
    }
}

fn time(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_time(idx, &raw)
}

fn optional_time(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_time(idx, &raw)).transpose()
}

fn parse_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM users WHERE id = ? AND is_deleted = 0", USER_COLUMNS);
            Ok(conn
                .query_row(&sql, params![id.0], Self::row_to_user)
                .optional()?)
        })
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM users WHERE email = ? AND is_deleted = 0",
                USER_COLUMNS
            );
            Ok(conn
                .query_row(&sql, params![email.as_str()], Self::row_to_user)
                .optional()?)
        })
    }

    async fn is_email_unique(&self, email: &Email) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            // Deleted users keep their address reserved.
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE email = ?",
                params![email.as_str()],
                |row| row.get(0),
            )?;
            Ok(count == 0)
        })
    }

    async fn list(&self, page: &PageRequest) -> Result<Page<User>, StoreError> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE is_deleted = 0",
                [],
                |row| row.get(0),
            )?;

            let sql = format!(
                "SELECT {} FROM users WHERE is_deleted = 0 ORDER BY name ASC, surname ASC, id ASC LIMIT ? OFFSET ?",
                USER_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let users = stmt
                .query_map(params![page.limit() as i64, page.offset() as i64], Self::row_to_user)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Page::new(users, page, total as u64))
        })
    }
}

#[async_trait]
impl TicketRepository for SqliteStore {
    async fn get_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM tickets WHERE id = ? AND is_deleted = 0",
                TICKET_COLUMNS
            );
            Ok(conn
                .query_row(&sql, params![id.0], Self::row_to_ticket)
                .optional()?)
        })
    }

    async fn list(
        &self,
        visibility: &TicketVisibility,
        page: &PageRequest,
    ) -> Result<Page<Ticket>, StoreError> {
        self.with_conn(|conn| {
            let (where_clause, params) = Self::build_where_clause(visibility);

            let count_sql = format!("SELECT COUNT(*) FROM tickets {}", where_clause);
            let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let total: i64 = conn.query_row(&count_sql, param_refs.as_slice(), |row| row.get(0))?;

            let sql = format!(
                "SELECT {} FROM tickets {} ORDER BY id ASC LIMIT ? OFFSET ?",
                TICKET_COLUMNS, where_clause
            );
            let mut all_params = params;
            all_params.push(Box::new(page.limit() as i64));
            all_params.push(Box::new(page.offset() as i64));
            let param_refs: Vec<&dyn rusqlite::ToSql> =
                all_params.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let tickets = stmt
                .query_map(param_refs.as_slice(), Self::row_to_ticket)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Page::new(tickets, page, total as u64))
        })
    }
}

#[async_trait]
impl CategoryRepository for SqliteStore {
    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT c.id, c.name, c.description, p.id, p.name, p.sla_hours FROM categories c JOIN priorities p ON p.id = c.priority_id WHERE c.id = ? AND c.is_deleted = 0",
                    params![id.0],
                    Self::row_to_category,
                )
                .optional()?)
        })
    }

    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.description, p.id, p.name, p.sla_hours FROM categories c JOIN priorities p ON p.id = c.priority_id WHERE c.is_deleted = 0 ORDER BY c.id ASC",
            )?;
            let categories = stmt
                .query_map([], Self::row_to_category)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        })
    }
}

impl UnitOfWorkFactory for SqliteStore {
    fn begin(&self) -> Box<dyn UnitOfWork> {
        Box::new(SqliteUnitOfWork {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

/// Queues changes in memory and writes them in a single transaction.
pub struct SqliteUnitOfWork {
    store: SqliteStore,
    pending: Vec<PendingChange>,
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    fn enqueue(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    async fn commit(&mut self) -> Result<CommitReceipt, StoreError> {
        let changes = std::mem::take(&mut self.pending);
        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut receipt = CommitReceipt::default();
            for change in changes {
                SqliteStore::apply(&tx, change, &mut receipt)?;
            }
            tx.commit()?;
            Ok(receipt)
        })
    }
}
