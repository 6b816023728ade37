//! Integration test harness for Clave Compás.
//!
//! Every test gets its own fake catalog backend and its own storefront, both
//! bound to ephemeral ports on 127.0.0.1. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p clave-compas-integration-tests
//! ```

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use clave_compas_storefront::config::{CatalogConfig, StorefrontConfig};
use clave_compas_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Build a product the way the catalog service serializes it.
#[must_use]
pub fn product_json(id: i32, name: &str, category: i32, images: usize) -> Value {
    json!({
        "idProduct": id,
        "name": name,
        "description": format!("Descripción de {name}"),
        "price": 120.5,
        "stock": 3,
        "idCategory": category,
        "imageUrls": (0..images)
            .map(|i| format!("https://img.example/{id}-{i}.jpg"))
            .collect::<Vec<_>>(),
    })
}

#[derive(Default)]
struct BackendInner {
    pages: Vec<Vec<Value>>,
    fail_listing: bool,
    /// `(page, pageSize)` query values of every listing request.
    listing_requests: Mutex<Vec<(String, String)>>,
}

/// In-process stand-in for the catalog REST service.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<BackendInner>,
}

impl FakeBackend {
    /// A backend serving `pages`, zero-based like the real service.
    #[must_use]
    pub fn with_pages(pages: Vec<Vec<Value>>) -> Self {
        Self {
            inner: Arc::new(BackendInner {
                pages,
                ..BackendInner::default()
            }),
        }
    }

    /// A backend whose listing endpoint always answers 500.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            inner: Arc::new(BackendInner {
                fail_listing: true,
                ..BackendInner::default()
            }),
        }
    }

    /// Query values of every listing request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    #[must_use]
    pub fn listing_requests(&self) -> Vec<(String, String)> {
        self.inner
            .listing_requests
            .lock()
            .expect("request log poisoned")
            .clone()
    }

    fn router(self) -> Router {
        Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .with_state(self)
    }
}

async fn list_products(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page = params.get("page").cloned().unwrap_or_default();
    let size = params.get("pageSize").cloned().unwrap_or_default();
    backend
        .inner
        .listing_requests
        .lock()
        .expect("request log poisoned")
        .push((page.clone(), size));

    if backend.inner.fail_listing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }

    let index: usize = page.parse().unwrap_or(0);
    let content = backend.inner.pages.get(index).cloned().unwrap_or_default();
    Json(json!({
        "response": {
            "content": content,
            "totalPages": backend.inner.pages.len(),
            "number": index,
        }
    }))
    .into_response()
}

async fn get_product(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    backend
        .inner
        .pages
        .iter()
        .flatten()
        .find(|p| p["idProduct"].as_i64() == Some(id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |product| Json(json!({ "response": product })).into_response(),
        )
}

/// Serve `router` on an ephemeral local port.
///
/// # Panics
///
/// Panics if the port cannot be bound.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });
    addr
}

/// A running storefront wired to a fake backend.
pub struct TestApp {
    pub client: reqwest::Client,
    pub base_url: String,
    pub backend: FakeBackend,
}

impl TestApp {
    /// Start a backend and a storefront pointing at it.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to start.
    pub async fn spawn(backend: FakeBackend) -> Self {
        let backend_addr = serve(backend.clone().router()).await;

        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            catalog: CatalogConfig {
                base_url: format!("http://{backend_addr}"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let addr = serve(clave_compas_storefront::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .no_proxy()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// GET `path` and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// POST an empty form to `path`, following the redirect.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }
}
