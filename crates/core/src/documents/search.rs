//! Combined search results.

use serde::{Deserialize, Serialize};

use super::{Product, PublicStore};

/// Products and stores matching a free-text query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "super::null_default")]
    pub products: Vec<Product>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub stores: Vec<PublicStore>,
}

impl SearchResults {
    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.stores.is_empty()
    }

    /// Number of matches across both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len() + self.stores.len()
    }
}
