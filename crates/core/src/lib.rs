//! Clave & Compas Core - Shared types library.
//!
//! This crate provides common types used across all Clave & Compas components:
//! - `storefront` - Public-facing instrument catalog
//! - `cli` - Command-line tools for browsing and administering the catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The catalog
//! itself lives in a remote backend service; these types describe what that
//! service hands back.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, plus the fixed category table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
