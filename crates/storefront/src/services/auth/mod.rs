//! Authentication service.
//!
//! Demo authentication: any non-empty password is accepted. Signing in with
//! an unknown email provisions an account on the spot; signing up requires
//! the email to be new.

mod error;

pub use error::AuthError;

use chrono::Utc;
use ecotrade_core::Email;
use ecotrade_core::user::User;

use crate::config::StorefrontConfig;
use crate::db::{Datastore, RepositoryError, UserRepository};

/// Maximum display name length, in characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    config: &'a StorefrontConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Datastore, config: &'a StorefrontConfig) -> Self {
        Self {
            users: UserRepository::new(store),
            config,
        }
    }

    /// Sign in, creating the account if the email is new.
    ///
    /// The administrator flag is refreshed from configuration on every sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validate_credentials(email, password)?;
        let is_admin = self.config.is_admin_email(&email);

        if let Some(mut user) = self.users.get_by_email(&email).await {
            if user.is_admin != is_admin {
                user.is_admin = is_admin;
                self.users.save(&user).await?;
            }
            return Ok(user);
        }

        let user = self
            .users
            .create(User::new(email, is_admin, Utc::now()))
            .await?;
        tracing::info!(user_id = %user.id, is_admin, "Provisioned account on sign-in");
        Ok(user)
    }

    /// Register a new account. New accounts are never administrators.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validate_credentials(email, password)?;

        let user = self
            .users
            .create(User::new(email, false, Utc::now()))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Registered account");
        Ok(user)
    }

    /// Change a shopper's public display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidDisplayName` if the name is blank or too long.
    /// Returns `AuthError::Repository` if the account no longer exists.
    pub async fn update_display_name(&self, user: &User, name: &str) -> Result<User, AuthError> {
        let name = validate_display_name(name)?;
        let mut updated = user.clone();
        updated.display_name = name;
        self.users.save(&updated).await?;
        Ok(updated)
    }

    /// Reload an account, picking up changes made by other sessions.
    pub async fn refresh(&self, user: &User) -> Option<User> {
        self.users.get_by_id(user.id).await
    }
}

/// Check that both fields are present and the email parses.
fn validate_credentials(email: &str, password: &str) -> Result<Email, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(Email::parse(email)?)
}

fn validate_display_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::InvalidDisplayName(
            "display name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(AuthError::InvalidDisplayName(format!(
            "display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}
