//! HTTP client for the catalog REST API.

use std::sync::Arc;

use clave_compas_core::{CategoryId, ProductId};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{Envelope, NewProduct, PAGE_SIZE, PageBody, PageNumber, Product, ProductPage};
use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

const USER_AGENT: &str = concat!("clave-compas/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters kept in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the remote catalog service.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(Url::parse(&format!("{}/{path}", self.inner.base_url))?)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(preview(&body)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and unwrap the `response` envelope.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, CatalogError> {
        let body = self.send(request).await?;
        parse_envelope::<T>(&body)?
            .response
            .ok_or_else(|| CatalogError::NotFound(what.to_string()))
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// Fetch a listing page, returning errors instead of degrading.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    #[instrument(skip(self), fields(page = %page))]
    pub async fn try_fetch_page(&self, page: PageNumber) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint("products")?;
        url.query_pairs_mut()
            .append_pair("page", &page.api_index().to_string())
            .append_pair("pageSize", &PAGE_SIZE.to_string());

        let body = self.send(self.inner.client.get(url)).await?;
        let envelope = parse_envelope::<PageBody>(&body)?;
        // A page envelope without a body is an empty page, not a missing one
        let page = ProductPage::from(envelope.response.unwrap_or_default());
        debug!(
            items = page.items.len(),
            total_pages = page.total_pages,
            served = %page.api_returned_page,
            "Fetched product page"
        );
        Ok(page)
    }

    /// Fetch the raw category list.
    ///
    /// The storefront navigates with its fixed category table; this exists
    /// for operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<serde_json::Value, CatalogError> {
        let request = self.inner.client.get(self.endpoint("categories")?);
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Admin Methods
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the error is also logged.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<serde_json::Value, CatalogError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("products")?)
            .json(product);

        self.admin_call(request, "create product").await
    }

    /// Move a product to another category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the error is also logged.
    #[instrument(skip(self))]
    pub async fn update_product_category(
        &self,
        id: ProductId,
        category_id: CategoryId,
    ) -> Result<serde_json::Value, CatalogError> {
        let url = self.endpoint(&format!("products/{id}/category/{category_id}"))?;
        let request = self
            .inner
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}");

        self.admin_call(request, "update product category").await
    }

    /// Disable (soft-delete) a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the error is also logged.
    #[instrument(skip(self))]
    pub async fn disable_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let request = self.inner.client.put(self.endpoint(&format!("products/{id}"))?);
        self.admin_call(request, "disable product").await.map(|_| ())
    }

    /// Run an admin mutation: log failures, then hand them back.
    async fn admin_call(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<serde_json::Value, CatalogError> {
        let result = match self.send(request).await {
            Ok(body) if body.trim().is_empty() => Ok(serde_json::Value::Null),
            Ok(body) => serde_json::from_str(&body).map_err(CatalogError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, action, "Catalog admin call failed");
        }
        result
    }
}

impl Catalog for CatalogClient {
    async fn fetch_page(&self, page: PageNumber) -> ProductPage {
        match self.try_fetch_page(page).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, page = %page, "Failed to list products");
                ProductPage::empty()
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let request = self.inner.client.get(self.endpoint(&format!("products/{id}"))?);
        self.send_json(request, &format!("product {id}")).await
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(body),
            "Failed to parse catalog response"
        );
        CatalogError::Parse(e)
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
