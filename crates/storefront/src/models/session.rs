//! Session-stored state.
//!
//! The server-side session replaces the browser storage a single-page shop
//! would use: the signed-in user record, the cart and checkout progress all
//! live under fixed keys.

use ecotrade_core::cart::Cart;
use ecotrade_core::checkout::CheckoutState;
use ecotrade_core::user::User;
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

/// Session keys.
pub mod keys {
    /// Serialized record of the signed-in user.
    pub const CURRENT_USER: &str = "ecotrade_user";

    /// Shopping cart.
    pub const CART: &str = "cart";

    /// Checkout progress.
    pub const CHECKOUT: &str = "checkout";
}

/// Read the signed-in user. Unreadable records count as signed out.
pub async fn current_user(session: &Session) -> Option<User> {
    session.get::<User>(keys::CURRENT_USER).await.ok().flatten()
}

/// Store the signed-in user record.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(session: &Session, user: &User) -> Result<(), SessionError> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Remove the signed-in user and any checkout in progress. The cart is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), SessionError> {
    session.remove::<User>(keys::CURRENT_USER).await?;
    session.remove::<CheckoutState>(keys::CHECKOUT).await?;
    Ok(())
}

/// Read the cart, empty if none is stored.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), SessionError> {
    session.insert(keys::CART, cart).await
}

/// Read checkout progress, starting fresh if none is stored.
pub async fn load_checkout(session: &Session) -> CheckoutState {
    session
        .get::<CheckoutState>(keys::CHECKOUT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_checkout(session: &Session, state: &CheckoutState) -> Result<(), SessionError> {
    session.insert(keys::CHECKOUT, state).await
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_checkout(session: &Session) -> Result<(), SessionError> {
    session.remove::<CheckoutState>(keys::CHECKOUT).await?;
    Ok(())
}
