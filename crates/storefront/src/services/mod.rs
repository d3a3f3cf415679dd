//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Demo sign-in, sign-up and profile updates
//! - `checkout` - Order placement
//! - `payment` - Mock payment gateway

pub mod auth;
pub mod checkout;
pub mod payment;
