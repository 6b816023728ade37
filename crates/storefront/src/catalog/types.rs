//! Domain types for the remote catalog service.
//!
//! The backend is a Spring-style REST API: every body is wrapped in a
//! `{ "response": ... }` envelope, list endpoints return a zero-based page,
//! and product fields use `idProduct`/`idCategory` naming.

use clave_compas_core::{Category, CategoryId, Price, ProductId};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of products requested per listing page.
pub const PAGE_SIZE: u32 = 10;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "idProduct", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    #[serde(rename = "idCategory", alias = "categoryId", default)]
    pub category_id: Option<CategoryId>,
    /// Ordered image URLs; the first one is the primary image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    /// Structured features, when the backend provides them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl Product {
    /// Exact category match. `None` matches every product.
    #[must_use]
    pub fn matches_category(&self, category: Option<CategoryId>) -> bool {
        category.is_none_or(|id| self.category_id == Some(id))
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lower-cased. An empty needle matches.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// The primary image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Gallery preview thumbnails: images two through five.
    #[must_use]
    pub fn preview_images(&self) -> &[String] {
        let end = self.image_urls.len().min(5);
        self.image_urls.get(1..end).unwrap_or_default()
    }

    /// The storefront category this product belongs to.
    #[must_use]
    pub fn category(&self) -> Option<&'static Category> {
        self.category_id.and_then(Category::by_id)
    }

    /// Features to display; empty until filled in by the detail loader.
    #[must_use]
    pub fn features(&self) -> &[String] {
        self.features.as_deref().unwrap_or_default()
    }
}

/// Payload for creating a product through the admin endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    #[serde(rename = "idCategory")]
    pub category_id: CategoryId,
    pub image_urls: Vec<String>,
}

// =============================================================================
// Pagination
// =============================================================================

/// A one-based page number as shown to visitors.
///
/// The catalog API counts pages from zero; [`PageNumber::api_index`] and
/// [`PageNumber::from_api_index`] are the only places the two meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Create a page number, clamping zero up to the first page.
    #[must_use]
    pub const fn new(page: u32) -> Self {
        if page == 0 { Self::FIRST } else { Self(page) }
    }

    /// Get the one-based value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The zero-based index the catalog API expects.
    #[must_use]
    pub const fn api_index(self) -> u32 {
        self.0 - 1
    }

    /// Convert a zero-based API page index back to a page number.
    #[must_use]
    pub const fn from_api_index(index: u32) -> Self {
        Self(index.saturating_add(1))
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of products as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Always at least 1.
    pub total_pages: u32,
    /// The page the backend says it served.
    pub api_returned_page: PageNumber,
}

impl ProductPage {
    /// The degraded result used when a page fetch fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
            api_returned_page: PageNumber::FIRST,
        }
    }
}

// =============================================================================
// Wire envelopes
// =============================================================================

/// The `{ "response": ... }` wrapper around every backend body.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: Option<T>,
}

/// Spring `Page` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageBody {
    #[serde(default)]
    pub content: Option<Vec<Product>>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

impl From<PageBody> for ProductPage {
    fn from(body: PageBody) -> Self {
        Self {
            items: body.content.unwrap_or_default(),
            total_pages: body.total_pages.filter(|&n| n > 0).unwrap_or(1),
            api_returned_page: PageNumber::from_api_index(body.number.unwrap_or(0)),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(name: &str, description: &str, category: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            description: description.to_string(),
            price: Price::default(),
            stock: 1,
            category_id: Some(CategoryId::new(category)),
            image_urls: Vec::new(),
            features: None,
        }
    }

    #[test]
    fn test_product_from_backend_names() {
        let product: Product = serde_json::from_value(json!({
            "idProduct": 7,
            "name": "Guitarra Acústica",
            "description": "Tapa de abeto",
            "price": 899.5,
            "stock": 3,
            "idCategory": 1,
            "imageUrls": ["a.jpg", "b.jpg"]
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.category_id, Some(CategoryId::new(1)));
        assert_eq!(product.price.display(), "$899.50");
        assert_eq!(product.primary_image(), Some("a.jpg"));
        assert!(product.features.is_none());
    }

    #[test]
    fn test_product_from_alias_names_and_nulls() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Maracas",
            "description": null,
            "categoryId": 2,
            "imageUrls": null,
            "features": ["Hechas a mano"]
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.description, "");
        assert_eq!(product.stock, 0);
        assert!(product.image_urls.is_empty());
        assert_eq!(product.features(), ["Hechas a mano".to_string()]);
    }

    #[test]
    fn test_matches_category() {
        let p = product("Viola", "", 1);
        assert!(p.matches_category(None));
        assert!(p.matches_category(Some(CategoryId::new(1))));
        assert!(!p.matches_category(Some(CategoryId::new(2))));
    }

    #[test]
    fn test_matches_query_name_or_description() {
        let p = product("Trompeta Piccolo", "Lacada en ORO", 3);
        assert!(p.matches_query(""));
        assert!(p.matches_query("trompeta"));
        assert!(p.matches_query("oro"));
        assert!(!p.matches_query("guitarra"));
    }

    #[test]
    fn test_preview_images_are_second_through_fifth() {
        let mut p = product("Teclado", "", 5);
        p.image_urls = (0..7).map(|i| format!("{i}.jpg")).collect();
        assert_eq!(p.preview_images(), ["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);

        p.image_urls.truncate(1);
        assert!(p.preview_images().is_empty());

        p.image_urls.clear();
        assert!(p.preview_images().is_empty());
    }

    #[test]
    fn test_page_number_translation() {
        assert_eq!(PageNumber::new(1).api_index(), 0);
        assert_eq!(PageNumber::new(4).api_index(), 3);
        assert_eq!(PageNumber::new(0), PageNumber::FIRST);
        assert_eq!(PageNumber::from_api_index(0), PageNumber::new(1));
        assert_eq!(PageNumber::from_api_index(2).get(), 3);
    }

    #[test]
    fn test_page_body_defaults() {
        let envelope: Envelope<PageBody> =
            serde_json::from_value(json!({ "response": { "totalPages": 0 } })).unwrap();
        let page = ProductPage::from(envelope.response.unwrap());
        assert_eq!(page, ProductPage::empty());
    }

    #[test]
    fn test_new_product_wire_names() {
        let body = serde_json::to_value(NewProduct {
            name: "Marimba".to_string(),
            description: "Cinco octavas".to_string(),
            price: "1500".parse().unwrap(),
            stock: 2,
            category_id: CategoryId::new(2),
            image_urls: vec!["m.jpg".to_string()],
        })
        .unwrap();

        assert_eq!(body["idCategory"], json!(2));
        assert_eq!(body["imageUrls"], json!(["m.jpg"]));
        assert_eq!(body["stock"], json!(2));
    }
}
