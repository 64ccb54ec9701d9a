//! Keyword search over the catalog.
//!
//! Matching is plain case-insensitive substring containment over a product's
//! name, description, tags and category. There is no tokenizing, stemming or
//! ranking; results keep catalog order.
//!
//! Interactive callers should go through [`SearchSession`], which debounces
//! keystrokes and publishes settled results on a watch channel.

mod session;

use greenshop_core::Product;

pub use session::{DEFAULT_DEBOUNCE, SearchSession};

/// Maximum number of results shown in a search preview.
pub const PREVIEW_LIMIT: usize = 10;

/// Normalize a raw query for matching (trim, lowercase).
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `product` matches an already normalized, non-empty query.
#[must_use]
pub fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
        || product.category.to_lowercase().contains(needle)
}

/// Results of one settled search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Normalized query the results were computed for.
    pub query: String,
    /// Matching products in catalog order.
    pub products: Vec<Product>,
}

impl SearchOutcome {
    /// Check if there are any results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the total number of results.
    #[must_use]
    pub fn total(&self) -> usize {
        self.products.len()
    }

    /// The first [`PREVIEW_LIMIT`] results.
    #[must_use]
    pub fn preview(&self) -> &[Product] {
        let end = self.products.len().min(PREVIEW_LIMIT);
        self.products.get(..end).unwrap_or_default()
    }
}

/// State of a debounced search session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No query, or the query was cleared.
    #[default]
    Idle,
    /// A query is waiting out the debounce window.
    Pending { query: String },
    /// Results for the most recent query.
    Ready(SearchOutcome),
}

impl SearchState {
    /// Results, if the session has settled.
    #[must_use]
    pub const fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            Self::Ready(outcome) => Some(outcome),
            Self::Idle | Self::Pending { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}
