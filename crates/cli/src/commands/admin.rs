//! Catalog admin commands.
//!
//! # Usage
//!
//! ```bash
//! cc-cli admin create -n "Maracas de madera" -p 25 -s 10 -c 2 -i https://img.example/m.jpg
//! cc-cli admin set-category 14 3
//! cc-cli admin disable 14
//! ```

use clave_compas_core::{Category, CategoryId, Price, ProductId};
use clave_compas_storefront::catalog::{CatalogClient, CatalogError, NewProduct};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Product name is blank.
    #[error("Product name cannot be empty")]
    EmptyName,

    /// Category is not one of the storefront categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The catalog rejected the call.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Validate input and build a product payload.
pub fn new_product(
    name: String,
    description: String,
    price: Price,
    stock: u32,
    category: CategoryId,
    image_urls: Vec<String>,
) -> Result<NewProduct, AdminError> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(AdminError::EmptyName);
    }
    if Category::by_id(category).is_none() {
        return Err(AdminError::UnknownCategory(category));
    }

    Ok(NewProduct {
        name,
        description,
        price,
        stock,
        category_id: category,
        image_urls,
    })
}

/// Create a product.
pub async fn create(client: &CatalogClient, product: &NewProduct) -> Result<(), AdminError> {
    tracing::info!("Creating product: {}", product.name);
    let created = client.create_product(product).await?;
    tracing::info!("Created: {created}");
    Ok(())
}

/// Move a product to another category.
pub async fn set_category(
    client: &CatalogClient,
    id: ProductId,
    category: CategoryId,
) -> Result<(), AdminError> {
    let Some(target) = Category::by_id(category) else {
        return Err(AdminError::UnknownCategory(category));
    };
    client.update_product_category(id, category).await?;
    tracing::info!("Product {id} moved to {}", target.name);
    Ok(())
}

/// Disable a product.
pub async fn disable(client: &CatalogClient, id: ProductId) -> Result<(), AdminError> {
    client.disable_product(id).await?;
    tracing::info!("Product {id} disabled");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn build(name: &str, category: i32) -> Result<NewProduct, AdminError> {
        new_product(
            name.to_string(),
            String::new(),
            "10".parse().unwrap(),
            1,
            CategoryId::new(category),
            Vec::new(),
        )
    }

    #[test]
    fn test_new_product_trims_name() {
        let product = build("  Cajón peruano ", 2).unwrap();
        assert_eq!(product.name, "Cajón peruano");
        assert_eq!(product.category_id, CategoryId::new(2));
    }

    #[test]
    fn test_new_product_rejects_blank_name() {
        assert!(matches!(build("   ", 2), Err(AdminError::EmptyName)));
    }

    #[test]
    fn test_new_product_rejects_unknown_category() {
        assert!(matches!(
            build("Cajón", 9),
            Err(AdminError::UnknownCategory(_))
        ));
    }
}
