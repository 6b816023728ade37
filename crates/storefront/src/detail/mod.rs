//! Product detail loading and gallery navigation.

mod features;

use clave_compas_core::ProductId;
use tracing::instrument;

use crate::catalog::{Catalog, Product};

pub use features::fallback_features;

/// Gallery step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// State of one product detail view.
///
/// `product` is `None` when loading failed; the view then renders its own
/// "not available" state instead of any product section.
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    product: Option<Product>,
    gallery_open: bool,
    current_image_index: usize,
}

impl DetailState {
    /// A view over a loaded product. Missing features are filled in.
    #[must_use]
    pub fn loaded(product: Product) -> Self {
        Self {
            product: Some(with_features(product)),
            gallery_open: false,
            current_image_index: 0,
        }
    }

    /// A view whose product could not be loaded.
    #[must_use]
    pub fn not_loaded() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    #[must_use]
    pub const fn is_gallery_open(&self) -> bool {
        self.gallery_open
    }

    #[must_use]
    pub const fn current_image_index(&self) -> usize {
        self.current_image_index
    }

    /// Number of gallery images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.product.as_ref().map_or(0, |p| p.image_urls.len())
    }

    /// The image the gallery is showing.
    #[must_use]
    pub fn current_image(&self) -> Option<&str> {
        self.product
            .as_ref()
            .and_then(|p| p.image_urls.get(self.current_image_index))
            .map(String::as_str)
    }

    /// Open the gallery at `index`, wrapped into range.
    ///
    /// Does nothing when there are no images.
    pub fn open(&mut self, index: usize) {
        let count = self.image_count();
        if count == 0 {
            return;
        }
        self.current_image_index = index % count;
        self.gallery_open = true;
    }

    pub fn close(&mut self) {
        self.gallery_open = false;
    }

    /// The index one step away, wrapping at both ends.
    #[must_use]
    pub fn peek(&self, direction: Direction) -> usize {
        let count = self.image_count();
        if count == 0 {
            return 0;
        }
        match direction {
            Direction::Next => (self.current_image_index + 1) % count,
            Direction::Previous => (self.current_image_index + count - 1) % count,
        }
    }

    /// Move one image forward or back, wrapping at both ends.
    pub fn step(&mut self, direction: Direction) {
        self.current_image_index = self.peek(direction);
    }
}

/// Fill in fallback features when the backend sent none.
#[must_use]
pub fn with_features(mut product: Product) -> Product {
    if product.features().is_empty() {
        product.features = Some(fallback_features(&product.name));
    }
    product
}

/// Load a product for the detail view.
///
/// Lookup failures are logged and produce a not-loaded state.
#[instrument(skip(catalog))]
pub async fn load<C: Catalog>(catalog: &C, id: ProductId) -> DetailState {
    match catalog.fetch_product(id).await {
        Ok(product) => DetailState::loaded(product),
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to load product detail");
            DetailState::not_loaded()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clave_compas_core::{CategoryId, Price};

    use super::*;
    use crate::catalog::{CatalogError, PageNumber, ProductPage};

    fn product(name: &str, images: usize, features: Option<Vec<String>>) -> Product {
        Product {
            id: ProductId::new(8),
            name: name.to_string(),
            description: String::new(),
            price: Price::default(),
            stock: 2,
            category_id: Some(CategoryId::new(1)),
            image_urls: (0..images).map(|i| format!("img-{i}.jpg")).collect(),
            features,
        }
    }

    struct SingleProduct(Option<Product>);

    impl Catalog for SingleProduct {
        async fn fetch_page(&self, _page: PageNumber) -> ProductPage {
            ProductPage::empty()
        }

        async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
            self.0
                .clone()
                .ok_or_else(|| CatalogError::NotFound(id.to_string()))
        }
    }

    #[test]
    fn test_backend_features_are_kept() {
        let state = DetailState::loaded(product("Viola", 1, Some(vec!["Arco incluido".into()])));
        assert_eq!(state.product().unwrap().features(), ["Arco incluido"]);
    }

    #[test]
    fn test_missing_or_empty_features_fall_back() {
        let state = DetailState::loaded(product("Viola", 1, None));
        assert_eq!(state.product().unwrap().features()[0], "Marca: stentor");

        let state = DetailState::loaded(product("Maracas", 1, Some(Vec::new())));
        assert_eq!(state.product().unwrap().features()[0], "Marca: Yamaha");
    }

    #[test]
    fn test_gallery_wraps_both_ways() {
        let mut state = DetailState::loaded(product("Teclado", 4, None));

        state.open(0);
        state.step(Direction::Previous);
        assert_eq!(state.current_image_index(), 3);

        state.step(Direction::Next);
        assert_eq!(state.current_image_index(), 0);

        state.open(3);
        state.step(Direction::Next);
        assert_eq!(state.current_image_index(), 0);
        assert_eq!(state.current_image(), Some("img-0.jpg"));
    }

    #[test]
    fn test_open_and_close() {
        let mut state = DetailState::loaded(product("Teclado", 4, None));
        assert!(!state.is_gallery_open());

        state.open(2);
        assert!(state.is_gallery_open());
        assert_eq!(state.current_image_index(), 2);

        state.close();
        assert!(!state.is_gallery_open());

        state.open(9);
        assert_eq!(state.current_image_index(), 1);
    }

    #[test]
    fn test_gallery_without_images_stays_closed() {
        let mut state = DetailState::loaded(product("Teclado", 0, None));
        state.open(0);
        assert!(!state.is_gallery_open());
        state.step(Direction::Next);
        assert_eq!(state.current_image_index(), 0);
        assert_eq!(state.current_image(), None);
    }

    #[tokio::test]
    async fn test_load_found() {
        let catalog = SingleProduct(Some(product("Guitarra Acústica", 2, None)));
        let state = load(&catalog, ProductId::new(8)).await;
        let product = state.product().unwrap();
        assert_eq!(product.features()[0], "Marca: Vibra");
        assert!(!state.is_gallery_open());
    }

    #[tokio::test]
    async fn test_load_failure_leaves_product_absent() {
        let state = load(&SingleProduct(None), ProductId::new(8)).await;
        assert!(state.product().is_none());
        assert_eq!(state.image_count(), 0);
    }
}
