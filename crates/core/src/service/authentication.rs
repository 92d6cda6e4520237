use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::user::{AuthenticationError, Email, PasswordHasher, User, UserRepository};

/// Verifies email and password pairs. Issues no tokens.
#[derive(Clone)]
pub struct AuthenticationService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthenticationService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Any failure, including a malformed email, yields the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let Ok(email) = Email::parse(email) else {
            warn!("Login with malformed email");
            return Err(AuthenticationError::InvalidEmailOrPassword.into());
        };

        let user = self.users.get_by_email(&email).await?;
        match user {
            Some(user) if user.verify_password(password, self.hasher.as_ref()) => {
                debug!(user_id = %user.id(), "Login succeeded");
                Ok(user)
            }
            _ => {
                warn!(email = %email, "Login failed");
                Err(AuthenticationError::InvalidEmailOrPassword.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{hasher, user, DEFAULT_PASSWORD};
    use crate::testing::InMemoryStore;
    use crate::user::{Role, UserId};

    async fn service() -> AuthenticationService {
        let store = InMemoryStore::new();
        store.add_user(user(10, Role::Analyst)).await;
        AuthenticationService::new(Arc::new(store), Arc::new(hasher()))
    }

    #[tokio::test]
    async fn test_login() {
        let service = service().await;
        let user = service
            .login("User10@helpdesk.example", DEFAULT_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.id(), UserId(10));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service().await;

        for (email, password) in [
            ("user10@helpdesk.example", "Wrong123!"),
            ("nobody@helpdesk.example", DEFAULT_PASSWORD),
            ("not an email", DEFAULT_PASSWORD),
        ] {
            let err = service.login(email, password).await.unwrap_err();
            assert_eq!(err.code(), "Authentication.InvalidEmailOrPassword");
        }
    }
}
