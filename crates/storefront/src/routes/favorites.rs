//! Favorites route handlers.
//!
//! Favorites live in the visitor's session; products are looked up from the
//! catalog each time the page renders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use clave_compas_core::ProductId;

use crate::catalog::Catalog;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Favorites, session_keys};
use crate::routes::home::ProductCardView;
use crate::state::AppState;

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub products: Vec<ProductCardView>,
    /// Favorites that could not be loaded from the catalog.
    pub missing: usize,
    pub favorite_count: usize,
}

/// Get the visitor's favorites from the session.
pub(crate) async fn load_favorites(
    session: &Session,
) -> std::result::Result<Favorites, tower_sessions::session::Error> {
    Ok(session
        .get::<Favorites>(session_keys::FAVORITES)
        .await?
        .unwrap_or_default())
}

/// Where to send the visitor after a toggle.
///
/// Only the path and query of the referring page are kept, so the redirect
/// never leaves this site.
fn redirect_target(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map_or_else(
            || "/favorites".to_string(),
            |url| match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
        )
}

/// Toggle a product in the visitor's favorites.
#[instrument(skip(session, headers))]
pub async fn toggle(
    session: Session,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let mut favorites = load_favorites(&session).await?;
    let added = favorites.toggle(id);
    session.insert(session_keys::FAVORITES, &favorites).await?;

    let id_str = id.to_string();
    add_breadcrumb(
        "favorites",
        if added { "Added favorite" } else { "Removed favorite" },
        Some(&[("product_id", id_str.as_str())]),
    );
    tracing::debug!(product_id = %id, added, "Toggled favorite");

    Ok(Redirect::to(&redirect_target(&headers)))
}

/// Display the visitor's favorite products.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let favorites = load_favorites(&session).await?;

    let mut products = Vec::with_capacity(favorites.len());
    for id in favorites.iter() {
        match state.catalog().fetch_product(id).await {
            Ok(product) => products.push(ProductCardView::new(&product, &favorites)),
            Err(e) => tracing::warn!(error = %e, product_id = %id, "Skipping unavailable favorite"),
        }
    }

    Ok(FavoritesTemplate {
        missing: favorites.len() - products.len(),
        favorite_count: favorites.len(),
        products,
    })
}
