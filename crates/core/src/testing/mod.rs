//! Testing utilities: an in-memory store and domain fixtures.
//!
//! Compiled for the crate's own tests and behind the `testing` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use helpdesk_core::testing::{fixtures, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.add_user(fixtures::user(1, Role::General)).await;
//! store.set_fail_commits(true).await;
//! ```

mod in_memory;

pub use in_memory::InMemoryStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use argon2::Params;
    use chrono::Utc;

    use crate::category::{Category, CategoryId, Priority, PriorityId};
    use crate::ticket::{Ticket, TicketId, TicketStatus};
    use crate::user::{
        Argon2PasswordHasher, Email, NewUser, Password, PasswordHasher, Role, User, UserId,
    };

    /// Password every fixture user is created with.
    pub const DEFAULT_PASSWORD: &str = "Passw0rd!";

    /// Argon2id at the minimum cost, to keep tests fast.
    pub fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(
            Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
                .unwrap(),
        )
    }

    fn priority(id: i64, name: &str, sla_hours: u32) -> Priority {
        Priority {
            id: PriorityId(id),
            name: name.to_string(),
            sla_hours,
        }
    }

    /// The four seeded categories, matching the SQLite seeds.
    pub fn standard_categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId(1),
                name: "Unavailability".to_string(),
                description: Some("A system or service is unavailable.".to_string()),
                priority: priority(4, "Critical", 4),
            },
            Category {
                id: CategoryId(2),
                name: "Slowness".to_string(),
                description: Some("A system or service is slower than usual.".to_string()),
                priority: priority(3, "High", 8),
            },
            Category {
                id: CategoryId(3),
                name: "Request".to_string(),
                description: Some("A request for access, equipment or software.".to_string()),
                priority: priority(2, "Medium", 24),
            },
            Category {
                id: CategoryId(4),
                name: "Question".to_string(),
                description: Some("A question about a system or procedure.".to_string()),
                priority: priority(1, "Low", 48),
            },
        ]
    }

    /// A category with the given id and a medium priority.
    pub fn category(id: i64) -> Category {
        Category {
            id: CategoryId(id),
            name: format!("Category {}", id),
            description: None,
            priority: priority(2, "Medium", 24),
        }
    }

    /// A stored user with the given id and role, email `user<id>@helpdesk.example`.
    pub fn user(id: i64, role: Role) -> User {
        User::restore(
            UserId(id),
            role,
            format!("User{}", id),
            role.name().to_string(),
            Email::parse(&format!("user{}@helpdesk.example", id)).unwrap(),
            hasher().hash(DEFAULT_PASSWORD).unwrap(),
            Utc::now(),
            None,
        )
    }

    /// An unsaved user named after the local part of `email`.
    pub fn new_user(email: &str, role: Role) -> NewUser {
        let name = email.split('@').next().unwrap_or(email);
        NewUser::new(
            role,
            name,
            role.name(),
            Email::parse(email).unwrap(),
            &Password::parse(DEFAULT_PASSWORD).unwrap(),
            &hasher(),
        )
        .unwrap()
    }

    /// Ticket 1 requested by user 1, forced into `status` without going
    /// through the transitions.
    ///
    /// Terminal statuses get the matching completion or cancellation field.
    pub fn ticket_in(status: TicketStatus, assignee: Option<i64>) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Some(TicketId(1)),
            category_id: CategoryId(1),
            status,
            requester_id: UserId(1),
            assignee_id: assignee.map(UserId),
            description: "fixture ticket".to_string(),
            completed_at: (status == TicketStatus::Completed).then_some(now),
            cancellation_reason: (status == TicketStatus::Cancelled)
                .then(|| "fixture cancellation".to_string()),
            created_at: now,
            last_updated_by: None,
            last_updated_at: None,
        }
    }
}
