//! Read-only catalog commands.

use clave_compas_core::ProductId;
use clave_compas_storefront::catalog::{Catalog, CatalogClient, CatalogError, PageNumber};
use clave_compas_storefront::detail::with_features;

/// Log one page of products.
pub async fn list(client: &CatalogClient, page: u32) -> Result<(), CatalogError> {
    let page = client.try_fetch_page(PageNumber::new(page)).await?;

    tracing::info!(
        "Page {} of {} ({} products)",
        page.api_returned_page,
        page.total_pages,
        page.items.len()
    );
    for product in &page.items {
        tracing::info!(
            "#{:<5} {:<40} {:>12}  stock {}",
            product.id,
            product.name,
            product.price.display(),
            product.stock
        );
    }
    Ok(())
}

/// Log a single product with its display features.
pub async fn show(client: &CatalogClient, id: ProductId) -> Result<(), CatalogError> {
    let product = with_features(client.fetch_product(id).await?);

    tracing::info!("#{} {}", product.id, product.name);
    tracing::info!("Price: {}", product.price.display());
    tracing::info!("Stock: {}", product.stock);
    if let Some(category) = product.category() {
        tracing::info!("Category: {}", category.name);
    }
    if !product.description.is_empty() {
        tracing::info!("{}", product.description);
    }
    for feature in product.features() {
        tracing::info!("  - {feature}");
    }
    for url in &product.image_urls {
        tracing::info!("  image: {url}");
    }
    Ok(())
}

/// Log the backend's category list as JSON.
pub async fn categories(client: &CatalogClient) -> Result<(), CatalogError> {
    let categories = client.get_categories().await?;
    tracing::info!("{}", serde_json::to_string_pretty(&categories)?);
    Ok(())
}
