//! Product listing pipeline.
//!
//! fetch page → filter by category and text → shuffle and sample → render.
//!
//! [`ListingState`] is the pure state machine; [`ListingPipeline`] binds it
//! to a [`Catalog`] and guards against out-of-order page responses: the state
//! lock is released while a fetch is in flight, and a response is applied
//! only if no newer fetch started in the meantime.

mod sessions;
mod state;

use std::sync::Arc;

use clave_compas_core::CategoryId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::catalog::{Catalog, PageNumber, Product};

pub use sessions::ListingSessions;
pub use state::{ListingState, RequestToken, SAMPLE_SIZE};

/// What a handler needs to render the listing.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    /// The sampled products, in display order.
    pub products: Vec<Product>,
    /// How many products on this page passed the filters.
    pub filtered_count: usize,
    pub current_page: PageNumber,
    pub total_pages: u32,
    pub selected_category: Option<CategoryId>,
    pub search_query: String,
    pub loading: bool,
    pub loaded: bool,
}

impl ListingSnapshot {
    /// Pagination is only shown when there is more than one page.
    #[must_use]
    pub const fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

impl From<&ListingState> for ListingSnapshot {
    fn from(state: &ListingState) -> Self {
        Self {
            products: state.sampled_products().to_vec(),
            filtered_count: state.filtered_products().len(),
            current_page: state.current_page(),
            total_pages: state.total_pages(),
            selected_category: state.selected_category(),
            search_query: state.search_query().to_string(),
            loading: state.is_loading(),
            loaded: state.is_loaded(),
        }
    }
}

struct PipelineInner {
    state: ListingState,
    rng: StdRng,
}

/// A listing bound to a catalog.
///
/// Clones share the same state.
pub struct ListingPipeline<C> {
    catalog: C,
    inner: Arc<Mutex<PipelineInner>>,
}

impl<C: Clone> Clone for ListingPipeline<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Catalog> ListingPipeline<C> {
    /// Create an empty listing seeded from the OS random source.
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// Create an empty listing with a caller-provided RNG.
    #[must_use]
    pub fn with_rng(catalog: C, rng: StdRng) -> Self {
        Self {
            catalog,
            inner: Arc::new(Mutex::new(PipelineInner {
                state: ListingState::new(),
                rng,
            })),
        }
    }

    /// Fetch `page` and make it the current page.
    ///
    /// Failed fetches leave an empty listing. If another `set_page` starts
    /// while this one is in flight, whichever started last wins.
    #[instrument(skip(self))]
    pub async fn set_page(&self, page: u32) -> ListingSnapshot {
        let (token, page) = self.inner.lock().await.state.begin_fetch(page);

        let result = self.catalog.fetch_page(page).await;

        let mut guard = self.inner.lock().await;
        let PipelineInner { state, rng } = &mut *guard;
        if !state.complete_fetch(token, result, rng) {
            debug!(page = %page, "Discarding stale page response");
        }
        ListingSnapshot::from(&*state)
    }

    /// Filter the current page by category. No network call.
    pub async fn set_category(&self, category: Option<CategoryId>) -> ListingSnapshot {
        let mut guard = self.inner.lock().await;
        let PipelineInner { state, rng } = &mut *guard;
        state.set_category(category, rng);
        ListingSnapshot::from(&*state)
    }

    /// Filter the current page by free text. No network call.
    pub async fn set_search(&self, query: &str) -> ListingSnapshot {
        let mut guard = self.inner.lock().await;
        let PipelineInner { state, rng } = &mut *guard;
        state.set_search(query, rng);
        ListingSnapshot::from(&*state)
    }

    /// Clear both filters. No network call.
    pub async fn reset_filters(&self) -> ListingSnapshot {
        let mut guard = self.inner.lock().await;
        let PipelineInner { state, rng } = &mut *guard;
        state.reset_filters(rng);
        ListingSnapshot::from(&*state)
    }

    /// The current listing without changing anything.
    pub async fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot::from(&self.inner.lock().await.state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use clave_compas_core::{Price, ProductId};
    use tokio::sync::Notify;

    use super::*;
    use crate::catalog::{CatalogError, ProductPage};

    fn product(id: i32, category: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Instrumento {id}"),
            description: String::new(),
            price: Price::default(),
            stock: 1,
            category_id: Some(CategoryId::new(category)),
            image_urls: Vec::new(),
            features: None,
        }
    }

    /// In-memory catalog that records requested pages.
    #[derive(Clone, Default)]
    struct FakeCatalog {
        pages: Arc<HashMap<u32, ProductPage>>,
        requests: Arc<StdMutex<Vec<u32>>>,
        gates: Arc<HashMap<u32, Arc<Notify>>>,
    }

    impl FakeCatalog {
        fn with_pages(total: u32, per_page: i32) -> Self {
            let pages = (1..=total)
                .map(|n| {
                    let first = i32::try_from(n).unwrap() * 100;
                    let items = (0..per_page).map(|i| product(first + i, 1 + i % 2)).collect();
                    let page = ProductPage {
                        items,
                        total_pages: total,
                        api_returned_page: PageNumber::new(n),
                    };
                    (n, page)
                })
                .collect();
            Self {
                pages: Arc::new(pages),
                ..Self::default()
            }
        }

        /// Hold responses for `page` until the returned notify fires.
        fn gate(mut self, page: u32) -> (Self, Arc<Notify>) {
            let notify = Arc::new(Notify::new());
            let mut gates = HashMap::new();
            gates.insert(page, Arc::clone(&notify));
            self.gates = Arc::new(gates);
            (self, notify)
        }

        fn requests(&self) -> Vec<u32> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Catalog for FakeCatalog {
        async fn fetch_page(&self, page: PageNumber) -> ProductPage {
            self.requests.lock().unwrap().push(page.get());
            if let Some(gate) = self.gates.get(&page.get()) {
                gate.notified().await;
            }
            self.pages
                .get(&page.get())
                .cloned()
                .unwrap_or_else(ProductPage::empty)
        }

        async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
            Err(CatalogError::NotFound(id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_set_page_fetches_and_samples() {
        let catalog = FakeCatalog::with_pages(3, 12);
        let pipeline = ListingPipeline::with_rng(catalog.clone(), StdRng::seed_from_u64(1));

        let snapshot = pipeline.set_page(2).await;
        assert_eq!(catalog.requests(), vec![2]);
        assert_eq!(snapshot.current_page.get(), 2);
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.filtered_count, 12);
        assert_eq!(snapshot.products.len(), SAMPLE_SIZE);
        assert!(snapshot.products.iter().all(|p| (200..212).contains(&p.id.as_i32())));
        assert!(!snapshot.loading);
        assert!(snapshot.show_pagination());
    }

    #[tokio::test]
    async fn test_filters_do_not_fetch() {
        let catalog = FakeCatalog::with_pages(2, 8);
        let pipeline = ListingPipeline::with_rng(catalog.clone(), StdRng::seed_from_u64(2));
        pipeline.set_page(1).await;

        let snapshot = pipeline.set_category(Some(CategoryId::new(2))).await;
        assert_eq!(snapshot.filtered_count, 4);
        let snapshot = pipeline.set_search("instrumento 10").await;
        assert_eq!(snapshot.filtered_count, 4);
        let snapshot = pipeline.reset_filters().await;
        assert_eq!(snapshot.filtered_count, 8);

        assert_eq!(catalog.requests(), vec![1]);
    }

    #[tokio::test]
    async fn test_filters_survive_page_change() {
        let catalog = FakeCatalog::with_pages(2, 6);
        let pipeline = ListingPipeline::with_rng(catalog, StdRng::seed_from_u64(3));
        pipeline.set_page(1).await;
        pipeline.set_category(Some(CategoryId::new(1))).await;

        let snapshot = pipeline.set_page(2).await;
        assert_eq!(snapshot.selected_category, Some(CategoryId::new(1)));
        assert_eq!(snapshot.filtered_count, 3);
        assert!(snapshot.products.iter().all(|p| p.id.as_i32() >= 200));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_empty_listing() {
        let pipeline = ListingPipeline::with_rng(FakeCatalog::default(), StdRng::seed_from_u64(6));

        let snapshot = pipeline.set_page(3).await;
        assert!(!snapshot.loading);
        assert!(snapshot.loaded);
        assert!(snapshot.products.is_empty());
        assert_eq!(snapshot.total_pages, 1);
        assert_eq!(snapshot.current_page, PageNumber::FIRST);
        assert!(!snapshot.show_pagination());
    }

    #[tokio::test]
    async fn test_failed_fetch_replaces_loaded_page() {
        let mut pages = HashMap::new();
        pages.insert(
            1,
            ProductPage {
                items: (0..4).map(|i| product(100 + i, 1)).collect(),
                total_pages: 3,
                api_returned_page: PageNumber::FIRST,
            },
        );
        let catalog = FakeCatalog {
            pages: Arc::new(pages),
            ..FakeCatalog::default()
        };
        let pipeline = ListingPipeline::with_rng(catalog.clone(), StdRng::seed_from_u64(7));
        assert_eq!(pipeline.set_page(1).await.products.len(), 4);

        let snapshot = pipeline.set_page(3).await;
        assert_eq!(catalog.requests(), vec![1, 3]);
        assert!(!snapshot.loading);
        assert!(snapshot.products.is_empty());
        assert_eq!(snapshot.total_pages, 1);
        assert_eq!(snapshot.current_page, PageNumber::FIRST);
    }

    #[tokio::test]
    async fn test_single_page_catalog_pins_navigation() {
        let catalog = FakeCatalog::with_pages(1, 4);
        let pipeline = ListingPipeline::with_rng(catalog.clone(), StdRng::seed_from_u64(4));

        let snapshot = pipeline.set_page(1).await;
        assert!(!snapshot.show_pagination());

        let snapshot = pipeline.set_page(3).await;
        assert_eq!(snapshot.current_page, PageNumber::FIRST);
        assert_eq!(catalog.requests(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_page() {
        let (catalog, release_first) = FakeCatalog::with_pages(3, 5).gate(1);
        let pipeline = ListingPipeline::with_rng(catalog.clone(), StdRng::seed_from_u64(5));

        let slow = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.set_page(1).await }
        });
        while catalog.requests().is_empty() {
            tokio::task::yield_now().await;
        }

        let pending = pipeline.snapshot().await;
        assert!(pending.loading);
        assert!(pending.current_page.get() <= pending.total_pages);

        let fresh = pipeline.set_page(2).await;
        assert_eq!(fresh.current_page.get(), 2);

        release_first.notify_one();
        let stale = slow.await.unwrap();

        assert_eq!(stale.current_page.get(), 2);
        assert!(stale.products.iter().all(|p| p.id.as_i32() >= 200));
        assert!(!stale.loading);

        let snapshot = pipeline.snapshot().await;
        assert_eq!(snapshot.current_page.get(), 2);
    }
}
