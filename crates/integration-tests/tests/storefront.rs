//! End-to-end storefront tests against a fake catalog backend.
//!
//! Run with: cargo test -p clave-compas-integration-tests

use clave_compas_integration_tests::{FakeBackend, TestApp, product_json};
use reqwest::StatusCode;
use serde_json::Value;

/// Three pages of four products; page N holds IDs N*10+1 to N*10+4.
fn three_pages() -> Vec<Vec<Value>> {
    (0..3)
        .map(|page| {
            (1..=4)
                .map(|i| {
                    let id = page * 10 + i;
                    product_json(id, &format!("Instrumento {id}"), 1 + i % 2, 2)
                })
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn(FakeBackend::with_pages(Vec::new())).await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_listing_requests_zero_based_page() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    let (status, body) = app.get("/?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.backend.listing_requests(),
        vec![("1".to_string(), "10".to_string())]
    );
    assert!(body.contains("Instrumento 11"));
    assert!(!body.contains("Instrumento 1<"));
    assert!(body.contains(r#"<span class="current">2</span>"#));
}

#[tokio::test]
async fn test_first_visit_loads_first_page() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    let (_, body) = app.get("/").await;
    assert_eq!(app.backend.listing_requests()[0].0, "0");
    assert!(body.contains("Instrumento 1<"));
    assert!(body.contains("$120.50"));
}

#[tokio::test]
async fn test_filters_do_not_refetch() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    app.get("/").await;
    // Category 2 holds the odd-indexed products: 1 and 3
    let (status, body) = app.get("/?category=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Instrumento 1<"));
    assert!(body.contains("Instrumento 3<"));
    assert!(!body.contains("Instrumento 2<"));
    assert!(!body.contains("Instrumento 4<"));
    assert!(body.contains("2 producto(s) en esta página"));

    let (_, body) = app.get("/?q=instrumento%204").await;
    assert!(body.contains("Instrumento 4<"));
    assert!(!body.contains("Instrumento 3<"));
    assert!(body.contains("1 producto(s) en esta página"));

    assert_eq!(app.backend.listing_requests().len(), 1);
}

#[tokio::test]
async fn test_invalid_category_is_bad_request() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;
    let (status, _) = app.get("/?category=cuerda").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_degrades_on_backend_error() {
    let app = TestApp::spawn(FakeBackend::failing()).await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No se encontraron productos"));
    assert!(!body.contains(r#"class="pagination""#));
}

#[tokio::test]
async fn test_pagination_only_with_multiple_pages() {
    let single = TestApp::spawn(FakeBackend::with_pages(vec![vec![product_json(
        1, "Viola", 1, 1,
    )]]))
    .await;
    let (_, body) = single.get("/").await;
    assert!(body.contains("Viola"));
    assert!(!body.contains(r#"class="pagination""#));

    let multi = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;
    let (_, body) = multi.get("/").await;
    assert!(body.contains(r#"class="pagination""#));
}

#[tokio::test]
async fn test_page_beyond_total_is_clamped() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    app.get("/").await;
    let (status, body) = app.get("/?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.backend.listing_requests()[1].0, "2");
    assert!(body.contains("Instrumento 21"));
}

#[tokio::test]
async fn test_detail_fills_fallback_features() {
    let backend = FakeBackend::with_pages(vec![vec![product_json(
        7,
        "Guitarra Acústica Clásica",
        1,
        3,
    )]]);
    let app = TestApp::spawn(backend).await;

    let (status, body) = app.get("/products/7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Marca: Vibra"));
    assert!(body.contains("Cuerda"));
    assert!(!body.contains("gallery-overlay"));
}

#[tokio::test]
async fn test_detail_keeps_backend_features() {
    let mut product = product_json(7, "Trompeta", 3, 1);
    product["features"] = serde_json::json!(["Boquilla 7C"]);
    let app = TestApp::spawn(FakeBackend::with_pages(vec![vec![product]])).await;

    let (_, body) = app.get("/products/7").await;
    assert!(body.contains("Boquilla 7C"));
    assert!(!body.contains("Marca: Eastrock"));
}

#[tokio::test]
async fn test_gallery_index_wraps() {
    let backend = FakeBackend::with_pages(vec![vec![product_json(7, "Marimba", 2, 3)]]);
    let app = TestApp::spawn(backend).await;

    let (status, body) = app.get("/products/7?gallery=open&image=5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("gallery-overlay"));
    assert!(body.contains("3 / 3"));
    assert!(body.contains("image=0"));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    let (status, body) = app.get("/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Producto no disponible"));
    assert!(!body.contains("Características"));
}

#[tokio::test]
async fn test_favorites_toggle() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    let (_, body) = app.get("/favorites").await;
    assert!(body.contains("Todavía no tienes favoritos"));

    let (status, body) = app.post("/favorites/12").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Instrumento 12"));
    assert!(body.contains("Favoritos (1)"));

    let (_, body) = app.post("/favorites/12").await;
    assert!(body.contains("Todavía no tienes favoritos"));
    assert!(body.contains("Favoritos (0)"));
}

#[tokio::test]
async fn test_unavailable_favorites_are_skipped() {
    let app = TestApp::spawn(FakeBackend::with_pages(three_pages())).await;

    app.post("/favorites/12").await;
    let (status, body) = app.post("/favorites/999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Instrumento 12"));
    assert!(body.contains("1 favorito(s) no están disponibles"));
}
