//! Per-visitor listing pipelines.
//!
//! Each visitor session carries a listing ID; the pipeline behind it lives
//! here until it has been idle for [`LISTING_IDLE_SECS`].

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use super::ListingPipeline;
use crate::catalog::Catalog;

/// Idle time after which a visitor's listing is dropped (30 minutes).
pub const LISTING_IDLE_SECS: u64 = 30 * 60;

/// Upper bound on concurrently tracked listings.
const MAX_LISTINGS: u64 = 10_000;

/// Registry of listing pipelines keyed by listing ID.
#[derive(Clone)]
pub struct ListingSessions<C> {
    catalog: C,
    cache: Cache<Uuid, ListingPipeline<C>>,
}

impl<C> ListingSessions<C>
where
    C: Catalog + Clone + 'static,
{
    /// Create an empty registry whose pipelines read from `catalog`.
    #[must_use]
    pub fn new(catalog: C) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_LISTINGS)
            .time_to_idle(Duration::from_secs(LISTING_IDLE_SECS))
            .build();

        Self { catalog, cache }
    }

    /// Get the pipeline for `id`, creating an empty one if needed.
    pub async fn get_or_create(&self, id: Uuid) -> ListingPipeline<C> {
        self.cache
            .get_with(id, async { ListingPipeline::new(self.catalog.clone()) })
            .await
    }
}
