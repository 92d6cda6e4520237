//! Service desk core: ticket lifecycle, users, categories and the services
//! that orchestrate them over pluggable persistence.

pub mod auth;
pub mod category;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod ticket;
pub mod user;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, BasicAuthenticator,
    HeaderAuthenticator, Identity,
};
pub use category::{Category, CategoryError, CategoryId, CategoryRepository, Priority};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, BuiltinUser, Config,
    ConfigError, SanitizedConfig,
};
pub use error::{ErrorKind, ServiceError, StoreError};
pub use service::{
    AuthenticationService, CategoryService, Services, StatusView, TicketService,
    TicketStatusService, UserService,
};
pub use store::{
    Collaborators, CommitReceipt, Page, PageRequest, SqliteStore, UnitOfWork, UnitOfWorkFactory,
};
pub use ticket::{
    Ticket, TicketDetails, TicketError, TicketId, TicketRepository, TicketStatus, TicketSummary,
    TicketVisibility,
};
pub use user::{
    Argon2PasswordHasher, AuthenticationError, Email, HashError, PasswordHasher, Role, User,
    UserDetails, UserError, UserId, UserRepository, UserSummary,
};
