//! Domain models for storefront.

pub mod session;

pub use session::{Favorites, keys as session_keys};
