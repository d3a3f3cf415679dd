//! Storefront models.
//!
//! Domain types live in `ecotrade_core`; this module holds the glue between
//! them and the HTTP session.

pub mod page;
pub mod session;

pub use page::PageContext;
pub use session::keys as session_keys;
