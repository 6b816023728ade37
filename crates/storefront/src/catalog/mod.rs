//! Remote catalog service client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, prices, stock and
//!   categories. Nothing is synced or persisted locally.
//! - [`CatalogClient`] wraps the REST endpoints with `reqwest`.
//! - [`Catalog`] is the read-side seam the listing pipeline and the detail
//!   loader depend on, so tests can hand them a fake backend.
//!
//! # Failure policy
//!
//! Listing fetches degrade: a failed page is logged and replaced with an
//! empty page so the view still renders. Single-product lookups and admin
//! mutations return their errors to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use clave_compas_storefront::catalog::{Catalog, CatalogClient, PageNumber};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let page = client.fetch_page(PageNumber::new(2)).await;
//! let product = client.fetch_product(page.items[0].id).await?;
//! ```

mod client;
pub mod types;

use std::future::Future;

use clave_compas_core::ProductId;
use thiserror::Error;

pub use client::CatalogClient;
pub use types::*;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404 or an empty `response`).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to the catalog.
pub trait Catalog: Send + Sync {
    /// Fetch one listing page.
    ///
    /// Never fails: errors are logged and an empty page is returned.
    fn fetch_page(&self, page: PageNumber) -> impl Future<Output = ProductPage> + Send;

    /// Fetch a single product by ID.
    fn fetch_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = CatalogError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Catalog returned HTTP 500: boom");
    }
}
