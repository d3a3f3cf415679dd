//! EcoTrade Core - Domain library for the sustainable-goods storefront.
//!
//! This crate provides the types and pure domain logic shared by the
//! storefront server and its tests:
//! - product catalog filtering and sorting
//! - the shopping cart reducer and its derived totals
//! - the multi-step checkout state machine
//! - order pricing, eco points and carbon-impact equivalents
//! - leaderboard ranking and per-user statistics
//!
//! # Architecture
//!
//! The core crate contains only types and synchronous transformations - no I/O,
//! no clocks beyond timestamps passed in, no HTTP. The storefront crate owns the
//! mock data layer, sessions and rendering.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices, carbon amounts and statuses
//! - [`catalog`] - Products, categories, filters and sort orders
//! - [`cart`] - Cart lines and cart operations
//! - [`order`] - Orders, shipping addresses and checkout pricing
//! - [`checkout`] - Shipping → payment → review state machine
//! - [`impact`] - Carbon savings comparisons
//! - [`user`] - Users and dashboard statistics
//! - [`leaderboard`] - Community ranking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod impact;
pub mod leaderboard;
pub mod order;
pub mod types;
pub mod user;

pub use types::*;
