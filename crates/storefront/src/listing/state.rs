//! The listing state machine.
//!
//! Every change flows through one cascade: a fetched page replaces
//! `all_products`, filters narrow it to `filtered_products`, and sampling
//! shuffles that into `sampled_products`. Nothing else writes these fields.

use clave_compas_core::CategoryId;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{PageNumber, Product, ProductPage};

/// Maximum number of products shown per render.
pub const SAMPLE_SIZE: usize = 10;

/// Identifies one page fetch. Only the newest token may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Listing state for one visitor.
///
/// Filters only see the page currently held in `all_products`, never the
/// whole catalog.
#[derive(Debug, Clone)]
pub struct ListingState {
    all_products: Vec<Product>,
    filtered_products: Vec<Product>,
    sampled_products: Vec<Product>,
    current_page: PageNumber,
    total_pages: u32,
    selected_category: Option<CategoryId>,
    search_query: String,
    loading: bool,
    loaded: bool,
    latest_request: u64,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingState {
    /// An empty listing on page 1 of 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            all_products: Vec::new(),
            filtered_products: Vec::new(),
            sampled_products: Vec::new(),
            current_page: PageNumber::FIRST,
            total_pages: 1,
            selected_category: None,
            search_query: String::new(),
            loading: false,
            loaded: false,
            latest_request: 0,
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Start fetching `requested`.
    ///
    /// Once a page has been loaded the request is clamped to `total_pages`.
    /// Returns the token for [`Self::complete_fetch`] and the page to fetch.
    /// `current_page` keeps the last served page until the response arrives.
    pub fn begin_fetch(&mut self, requested: u32) -> (RequestToken, PageNumber) {
        let mut page = PageNumber::new(requested);
        if self.loaded && page.get() > self.total_pages {
            page = PageNumber::new(self.total_pages);
        }

        self.latest_request += 1;
        self.loading = true;
        (RequestToken(self.latest_request), page)
    }

    /// Apply a fetched page.
    ///
    /// Returns `false` and leaves the state untouched if a newer fetch was
    /// started after `token` was issued.
    pub fn complete_fetch<R: Rng + ?Sized>(
        &mut self,
        token: RequestToken,
        page: ProductPage,
        rng: &mut R,
    ) -> bool {
        if token.0 != self.latest_request {
            return false;
        }

        self.all_products = page.items;
        self.total_pages = page.total_pages.max(1);
        // The served page wins over the requested one
        self.current_page = PageNumber::new(page.api_returned_page.get().min(self.total_pages));
        self.loading = false;
        self.loaded = true;
        self.refilter(rng);
        true
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Select a category, or clear the category filter with `None`.
    ///
    /// Returns whether anything changed; an unchanged value does not resample.
    pub fn set_category<R: Rng + ?Sized>(
        &mut self,
        category: Option<CategoryId>,
        rng: &mut R,
    ) -> bool {
        if self.selected_category == category {
            return false;
        }
        self.selected_category = category;
        self.refilter(rng);
        true
    }

    /// Set the free-text query. Surrounding whitespace is ignored.
    ///
    /// Returns whether anything changed; an unchanged value does not resample.
    pub fn set_search<R: Rng + ?Sized>(&mut self, query: &str, rng: &mut R) -> bool {
        let query = query.trim();
        if self.search_query == query {
            return false;
        }
        self.search_query = query.to_string();
        self.refilter(rng);
        true
    }

    /// Clear both filters.
    pub fn reset_filters<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.selected_category.is_none() && self.search_query.is_empty() {
            return false;
        }
        self.selected_category = None;
        self.search_query.clear();
        self.refilter(rng);
        true
    }

    fn refilter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let needle = self.search_query.to_lowercase();
        self.filtered_products = self
            .all_products
            .iter()
            .filter(|p| p.matches_category(self.selected_category))
            .filter(|p| p.matches_query(&needle))
            .cloned()
            .collect();
        self.resample(rng);
    }

    /// Draw up to [`SAMPLE_SIZE`] products from the filtered set in random
    /// order.
    ///
    /// Deliberately not idempotent: each call gives a fresh "featured" pick.
    pub fn resample<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut sample = self.filtered_products.clone();
        sample.shuffle(rng);
        sample.truncate(SAMPLE_SIZE);
        self.sampled_products = sample;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn all_products(&self) -> &[Product] {
        &self.all_products
    }

    #[must_use]
    pub fn filtered_products(&self) -> &[Product] {
        &self.filtered_products
    }

    #[must_use]
    pub fn sampled_products(&self) -> &[Product] {
        &self.sampled_products
    }

    #[must_use]
    pub const fn current_page(&self) -> PageNumber {
        self.current_page
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn selected_category(&self) -> Option<CategoryId> {
        self.selected_category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether any fetch has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}
