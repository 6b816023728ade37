//! Product detail route handler.
//!
//! The gallery is driven by query parameters: `?gallery=open&image=N` opens
//! the overlay at image `N`, and the previous/next links wrap around.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use clave_compas_core::{Price, ProductId};

use crate::catalog::Product;
use crate::detail::{self, DetailState, Direction};
use crate::error::Result;
use crate::filters;
use crate::routes::favorites::load_favorites;
use crate::state::AppState;

/// Gallery query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    /// `open` shows the gallery overlay.
    pub gallery: Option<String>,
    /// Zero-based image index.
    pub image: Option<usize>,
}

impl GalleryQuery {
    fn is_open(&self) -> bool {
        self.gallery.as_deref() == Some("open")
    }
}

/// A preview thumbnail linking into the gallery.
#[derive(Clone)]
pub struct ThumbnailView {
    pub url: String,
    pub href: String,
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category: Option<&'static str>,
    pub primary_image: Option<String>,
    pub gallery_href: String,
    pub previews: Vec<ThumbnailView>,
    pub features: Vec<String>,
    pub is_favorite: bool,
}

/// Open gallery overlay display data.
#[derive(Clone)]
pub struct GalleryView {
    pub image: String,
    /// One-based position for display.
    pub position: usize,
    pub count: usize,
    pub prev_href: String,
    pub next_href: String,
    pub close_href: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub gallery: Option<GalleryView>,
    pub favorite_count: usize,
}

/// Shown when the product could not be loaded.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub id: i32,
    pub favorite_count: usize,
}

fn gallery_href(id: ProductId, index: usize) -> String {
    format!("/products/{id}?gallery=open&image={index}")
}

impl ProductDetailView {
    fn new(product: &Product, is_favorite: bool) -> Self {
        let previews = product
            .preview_images()
            .iter()
            .enumerate()
            .map(|(i, url)| ThumbnailView {
                url: url.clone(),
                // Previews start at the second image
                href: gallery_href(product.id, i + 1),
            })
            .collect();

        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category: product.category().map(|c| c.name),
            primary_image: product.primary_image().map(ToString::to_string),
            gallery_href: gallery_href(product.id, 0),
            previews,
            features: product.features().to_vec(),
            is_favorite,
        }
    }
}

impl GalleryView {
    fn new(id: ProductId, state: &DetailState) -> Option<Self> {
        if !state.is_gallery_open() {
            return None;
        }
        let image = state.current_image()?.to_string();

        Some(Self {
            image,
            position: state.current_image_index() + 1,
            count: state.image_count(),
            prev_href: gallery_href(id, state.peek(Direction::Previous)),
            next_href: gallery_href(id, state.peek(Direction::Next)),
            close_href: format!("/products/{id}"),
        })
    }
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Query(query): Query<GalleryQuery>,
) -> Result<Response> {
    let favorites = load_favorites(&session).await?;
    let mut detail = detail::load(state.catalog(), id).await;

    let Some(product) = detail.product() else {
        return Ok((
            StatusCode::NOT_FOUND,
            ProductNotFoundTemplate {
                id: id.as_i32(),
                favorite_count: favorites.len(),
            },
        )
            .into_response());
    };
    let product = ProductDetailView::new(product, favorites.contains(id));

    if query.is_open() {
        detail.open(query.image.unwrap_or(0));
    }

    Ok(ProductShowTemplate {
        product,
        gallery: GalleryView::new(id, &detail),
        favorite_count: favorites.len(),
    }
    .into_response())
}
