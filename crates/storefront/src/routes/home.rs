//! Listing page route handler.
//!
//! Each visitor gets a listing pipeline keyed by an ID kept in their session.
//! Query parameters drive the pipeline: a page change fetches from the
//! catalog, while category and text filters only narrow the page in hand.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use clave_compas_core::{CATEGORIES, CategoryId, Price};

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::listing::ListingSnapshot;
use crate::models::{Favorites, session_keys};
use crate::routes::favorites::load_favorites;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub category: Option<&'static str>,
    pub stock: u32,
    pub is_favorite: bool,
}

impl ProductCardView {
    pub fn new(product: &Product, favorites: &Favorites) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().map(ToString::to_string),
            category: product.category().map(|c| c.name),
            stock: product.stock,
            is_favorite: favorites.contains(product.id),
        }
    }
}

/// Category filter link.
#[derive(Clone)]
pub struct CategoryLinkView {
    pub name: &'static str,
    pub href: String,
    pub active: bool,
}

/// A numbered page link.
#[derive(Clone)]
pub struct PageLinkView {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Pagination controls. Only built when there is more than one page.
#[derive(Clone)]
pub struct PaginationView {
    pub pages: Vec<PageLinkView>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
    pub all_categories_href: String,
    pub no_category: bool,
    pub search_query: String,
    pub selected_category: String,
    pub pagination: Option<PaginationView>,
    /// Products on this page that pass the filters; the grid shows at most
    /// ten of them.
    pub result_count: usize,
    pub loading: bool,
    pub favorite_count: usize,
}

// =============================================================================
// Query
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// One-based page. Absent keeps the visitor's current page.
    pub page: Option<u32>,
    /// Category ID. Absent or empty means all categories.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

impl ListingQuery {
    /// Parse the category parameter.
    fn category_id(&self) -> Result<Option<CategoryId>> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<CategoryId>()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("invalid category: {raw}"))),
        }
    }
}

/// Build a listing URL carrying page and filters.
fn listing_href(page: Option<u32>, category: Option<CategoryId>, query: &str) -> String {
    let mut params = Vec::new();
    if let Some(page) = page {
        params.push(format!("page={page}"));
    }
    if let Some(category) = category {
        params.push(format!("category={category}"));
    }
    if !query.is_empty() {
        params.push(format!("q={}", urlencoding::encode(query)));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

fn pagination(snapshot: &ListingSnapshot) -> Option<PaginationView> {
    if !snapshot.show_pagination() {
        return None;
    }

    let current = snapshot.current_page.get();
    let category = snapshot.selected_category;
    let query = snapshot.search_query.as_str();

    let pages = (1..=snapshot.total_pages)
        .map(|number| PageLinkView {
            number,
            href: listing_href(Some(number), category, query),
            current: number == current,
        })
        .collect();

    Some(PaginationView {
        pages,
        prev_href: (current > 1).then(|| listing_href(Some(current - 1), category, query)),
        next_href: (current < snapshot.total_pages)
            .then(|| listing_href(Some(current + 1), category, query)),
    })
}

fn category_links(snapshot: &ListingSnapshot) -> Vec<CategoryLinkView> {
    CATEGORIES
        .iter()
        .map(|category| CategoryLinkView {
            name: category.name,
            href: listing_href(None, Some(category.id), &snapshot.search_query),
            active: snapshot.selected_category == Some(category.id),
        })
        .collect()
}

// =============================================================================
// Session
// =============================================================================

/// Get the visitor's listing ID, assigning one on first visit.
async fn listing_id(session: &Session) -> std::result::Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(session_keys::LISTING_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(session_keys::LISTING_ID, id).await?;
    Ok(id)
}

// =============================================================================
// Handler
// =============================================================================

/// Display the product listing.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let category = query.category_id()?;
    let search = query.q.as_deref().unwrap_or_default();

    let pipeline = state
        .listings()
        .get_or_create(listing_id(&session).await?)
        .await;

    let current = pipeline.snapshot().await;
    let page_changed = query
        .page
        .is_some_and(|page| page.max(1) != current.current_page.get());
    if !current.loaded || page_changed {
        pipeline
            .set_page(query.page.unwrap_or(current.current_page.get()))
            .await;
    }

    let snapshot = if category.is_none() && search.trim().is_empty() {
        pipeline.reset_filters().await
    } else {
        pipeline.set_category(category).await;
        pipeline.set_search(search).await
    };

    let favorites = load_favorites(&session).await?;

    Ok(HomeTemplate {
        products: snapshot
            .products
            .iter()
            .map(|p| ProductCardView::new(p, &favorites))
            .collect(),
        categories: category_links(&snapshot),
        all_categories_href: listing_href(None, None, &snapshot.search_query),
        no_category: snapshot.selected_category.is_none(),
        search_query: snapshot.search_query.clone(),
        selected_category: snapshot
            .selected_category
            .map(|id| id.to_string())
            .unwrap_or_default(),
        pagination: pagination(&snapshot),
        result_count: snapshot.filtered_count,
        loading: snapshot.loading,
        favorite_count: favorites.len(),
    })
}
