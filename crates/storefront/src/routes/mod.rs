//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing (?page=N&category=ID&q=TEXT)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail (?gallery=open&image=N)
//!
//! # Favorites
//! GET  /favorites              - Favorite products
//! POST /favorites/{id}         - Toggle a favorite, redirect back
//! ```

pub mod favorites;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/{id}", post(favorites::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Listing
        .route("/", get(home::home))
        // Product detail
        .route("/products/{id}", get(products::show))
        // Favorites
        .nest("/favorites", favorite_routes())
}
