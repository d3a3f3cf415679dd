//! Core types for EcoTrade.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod carbon;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use carbon::{CarbonKg, ImpactBand};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
