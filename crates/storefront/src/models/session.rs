//! Session-related types.
//!
//! Types stored in the visitor's session: the listing handle and favorites.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use clave_compas_core::ProductId;

/// Products a visitor has marked as favorite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(BTreeSet<ProductId>);

impl Favorites {
    /// Flip membership of `id`. Returns `true` if it is now a favorite.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Favorite IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.iter().copied()
    }
}

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's listing pipeline ID.
    pub const LISTING_ID: &str = "listing_id";

    /// Key for the visitor's favorite product IDs.
    pub const FAVORITES: &str = "favorites";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle(ProductId::new(4)));
        assert!(favorites.contains(ProductId::new(4)));
        assert!(!favorites.toggle(ProductId::new(4)));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_serializes_as_sorted_list() {
        let mut favorites = Favorites::default();
        favorites.toggle(ProductId::new(9));
        favorites.toggle(ProductId::new(2));
        assert_eq!(serde_json::to_string(&favorites).unwrap(), "[2,9]");
        assert_eq!(favorites.iter().collect::<Vec<_>>(), [ProductId::new(2), ProductId::new(9)]);
    }
}
