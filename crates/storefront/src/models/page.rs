//! Per-request data every full page renders in its header.

use axum::{extract::FromRequestParts, http::request::Parts};
use ecotrade_core::user::User;
use tower_sessions::Session;

use super::session::{current_user, load_cart};

/// Signed-in user and cart badge count for the page chrome.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<User>,
    pub cart_count: u32,
}

impl PageContext {
    /// Read the page chrome from the session.
    pub async fn load(session: &Session) -> Self {
        Self {
            user: current_user(session).await,
            cart_count: load_cart(session).await.total_items(),
        }
    }

    /// Whether the signed-in user may use the admin API.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::load(session).await),
            None => Ok(Self::default()),
        }
    }
}
