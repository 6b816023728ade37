//! Instrument categories.
//!
//! The backend exposes a `/categories` endpoint, but the storefront never
//! reads it for navigation: the category bar is this fixed table.

use serde::Serialize;

use super::id::CategoryId;

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Backend category ID (matches `Product::category_id`).
    pub id: CategoryId,
    /// Display name.
    pub name: &'static str,
}

/// The five storefront categories, in display order.
pub static CATEGORIES: [Category; 5] = [
    Category {
        id: CategoryId::new(1),
        name: "Cuerda",
    },
    Category {
        id: CategoryId::new(2),
        name: "Percusión",
    },
    Category {
        id: CategoryId::new(3),
        name: "Viento",
    },
    Category {
        id: CategoryId::new(4),
        name: "Audio Profesional",
    },
    Category {
        id: CategoryId::new(5),
        name: "Instrumentos Electrónicos",
    },
];

impl Category {
    /// Look up a category by ID.
    #[must_use]
    pub fn by_id(id: CategoryId) -> Option<&'static Self> {
        CATEGORIES.iter().find(|c| c.id == id)
    }
}
