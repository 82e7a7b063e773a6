//! Account creation and credential checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::form::FieldErrors;
use crate::ports::{PasswordService, UserRepository};

/// Shortest password accepted for a new account.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create an account with a hashed password.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        let mut errors = FieldErrors::new();
        if username.is_empty() {
            errors.add("username", "This field is required.");
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Username '{username}' is already taken"
            )));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert(User::new(username.to_string(), password_hash, now))
            .await?;

        tracing::info!(username = %user.username, "Account created");
        Ok(user)
    }

    /// The account behind a session, if it still exists.
    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// The matching user, or `None` when the username or password is wrong.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Ok(None);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(valid.then_some(user))
    }
}
