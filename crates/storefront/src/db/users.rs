//! User repository.
//!
//! Accounts are keyed by normalized email, so a shopper who signs out and
//! back in gets the same account, points and orders.

use ecotrade_core::user::User;
use ecotrade_core::{Email, UserId};

use super::{Datastore, RepositoryError};

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a Datastore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a Datastore) -> Self {
        Self { store }
    }

    /// Get a user by their email address.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        self.store.delay().await;
        self.store
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == *email)
            .cloned()
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        self.store.delay().await;
        self.store
            .users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(&self, user: User) -> Result<User, RepositoryError> {
        self.store.delay().await;
        let mut users = self.store.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    /// Replace the stored account with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this ID.
    pub async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.store.delay().await;
        let mut users = self.store.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(())
    }
}
