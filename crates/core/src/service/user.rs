//! User registration, provisioning and profile use cases.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::load_user;
use crate::error::{ServiceError, StoreError};
use crate::store::{Collaborators, Page, PageRequest};
use crate::user::{
    Email, NewUser, Password, PasswordHasher, Role, UserDetails, UserError, UserId, UserSummary,
};

#[derive(Clone)]
pub struct UserService {
    collaborators: Collaborators,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(collaborators: Collaborators, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            collaborators,
            hasher,
        }
    }

    /// Self-service sign-up. New accounts always get the General role.
    pub async fn register(
        &self,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, ServiceError> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;

        if !self.collaborators.users.is_email_unique(&email).await? {
            warn!(email = %email, "Registration with duplicate email");
            return Err(UserError::DuplicateEmail.into());
        }

        self.insert(Role::General, name, surname, email, &password).await
    }

    /// Create a built-in account unless its email is already taken.
    ///
    /// Returns `None` when the account already existed.
    pub async fn provision(
        &self,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<UserId>, ServiceError> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;

        if !self.collaborators.users.is_email_unique(&email).await? {
            debug!(email = %email, "Built-in user already present");
            return Ok(None);
        }

        self.insert(role, name, surname, email, &password).await.map(Some)
    }

    async fn insert(
        &self,
        role: Role,
        name: &str,
        surname: &str,
        email: Email,
        password: &Password,
    ) -> Result<UserId, ServiceError> {
        let user = NewUser::new(role, name, surname, email, password, self.hasher.as_ref())?;
        let email = user.email().clone();

        let mut uow = self.collaborators.units.begin();
        uow.insert_user(user);
        let receipt = uow.commit().await?;
        let user_id = receipt
            .user_ids
            .first()
            .copied()
            .ok_or_else(|| StoreError::Rejected("commit returned no user id".to_string()))?;

        info!(user_id = %user_id, email = %email, role = %role, "User created");
        Ok(user_id)
    }

    /// A user may read their own profile; administrators may read any.
    pub async fn get_user_by_id(
        &self,
        actor_id: UserId,
        user_id: UserId,
    ) -> Result<UserDetails, ServiceError> {
        let actor = load_user(&self.collaborators, actor_id).await?;
        if actor.id() != user_id && actor.role() != Role::Administrator {
            return Err(UserError::InvalidPermissions.into());
        }
        let user = load_user(&self.collaborators, user_id).await?;
        Ok(UserDetails::from(&user))
    }

    /// Users ordered by name. General users may not list accounts.
    pub async fn get_users(
        &self,
        actor_id: UserId,
        page: i64,
        page_size: i64,
    ) -> Result<Page<UserSummary>, ServiceError> {
        let actor = load_user(&self.collaborators, actor_id).await?;
        if actor.role() == Role::General {
            warn!(performer_id = %actor_id, "User listing denied");
            return Err(UserError::InvalidPermissions.into());
        }

        let request = PageRequest::new(page, page_size);
        let users = self.collaborators.users.list(&request).await?;
        Ok(users.map(|u| UserSummary::from(&u)))
    }

    pub async fn update_user(
        &self,
        user_id: UserId,
        name: &str,
        surname: &str,
    ) -> Result<(), ServiceError> {
        let mut user = load_user(&self.collaborators, user_id).await?;
        user.change_name(name, surname)?;

        let mut uow = self.collaborators.units.begin();
        uow.update_user(user);
        uow.commit().await?;

        info!(user_id = %user_id, "User renamed");
        Ok(())
    }

    pub async fn change_password(&self, user_id: UserId, password: &str) -> Result<(), ServiceError> {
        let password = Password::parse(password)?;
        let mut user = load_user(&self.collaborators, user_id).await?;
        user.change_password(&password, self.hasher.as_ref())?;

        let mut uow = self.collaborators.units.begin();
        uow.update_user(user);
        uow.commit().await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
