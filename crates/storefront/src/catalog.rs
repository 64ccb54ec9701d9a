//! Read-only product catalog.
//!
//! The catalog is built once at startup and never mutated. It is shared as an
//! `Arc<Catalog>` between the engines and any search sessions; every query is
//! a pure pass over the ordered product list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use greenshop_core::{Money, Product, ProductId, Slug};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::search;

/// Catalog bundled with the storefront.
const BUNDLED_PRODUCTS: &str = include_str!("../data/products.json");

/// Errors that can occur while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(Slug),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Named product listings offered by the storefront.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    #[default]
    All,
    BestSellers,
    Discounts,
    MostCommon,
    RecentlyAdded,
}

impl Collection {
    /// Every collection, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::BestSellers,
        Self::Discounts,
        Self::MostCommon,
        Self::RecentlyAdded,
    ];

    /// Parse from a URL path segment.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "best-sellers" => Some(Self::BestSellers),
            "discounts" => Some(Self::Discounts),
            "most-common" => Some(Self::MostCommon),
            "recently-added" | "added-recently" => Some(Self::RecentlyAdded),
            _ => None,
        }
    }

    /// Convert to a URL path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::BestSellers => "best-sellers",
            Self::Discounts => "discounts",
            Self::MostCommon => "most-common",
            Self::RecentlyAdded => "recently-added",
        }
    }

    /// Human readable heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::All => "All Flowers",
            Self::BestSellers => "Best Sellers",
            Self::Discounts => "Discounts",
            Self::MostCommon => "Most Common",
            Self::RecentlyAdded => "Recently Added",
        }
    }
}

/// An immutable, ordered collection of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating that ids and slugs are unique and prices
    /// are non-negative.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on a duplicate id or slug or a negative price.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::with_capacity(products.len());
        let mut slugs = HashSet::with_capacity(products.len());

        for product in &products {
            if !ids.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
            if product.price < Money::ZERO {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
        }

        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is invalid or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or is invalid.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!(products = catalog.len(), "Loaded catalog from file");
        Ok(catalog)
    }

    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_PRODUCTS)
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug.as_str() == slug)
    }

    /// Case-insensitive substring search across name, description, tags and
    /// category.
    ///
    /// An empty (or all-whitespace) query returns the full catalog. Results
    /// keep catalog order; there is no ranking.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = search::normalize_query(query);
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.filter(|p| search::matches(p, &needle))
    }

    #[must_use]
    pub fn best_sellers(&self) -> Vec<&Product> {
        self.filter(|p| p.best_seller)
    }

    /// Products whose original price is above the current price.
    #[must_use]
    pub fn discounted(&self) -> Vec<&Product> {
        self.filter(Product::is_discounted)
    }

    #[must_use]
    pub fn most_common(&self) -> Vec<&Product> {
        self.filter(|p| p.most_common)
    }

    /// Full catalog, newest first. Products added at the same instant keep
    /// their catalog order.
    #[must_use]
    pub fn recently_added(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        // sort_by is stable
        products.sort_by(|a, b| b.added_date.cmp(&a.added_date));
        products
    }

    /// Products listed under a named collection.
    #[must_use]
    pub fn collection(&self, collection: Collection) -> Vec<&Product> {
        match collection {
            Collection::All => self.products.iter().collect(),
            Collection::BestSellers => self.best_sellers(),
            Collection::Discounts => self.discounted(),
            Collection::MostCommon => self.most_common(),
            Collection::RecentlyAdded => self.recently_added(),
        }
    }

    fn filter(&self, predicate: impl Fn(&Product) -> bool) -> Vec<&Product> {
        self.products.iter().filter(|p| predicate(p)).collect()
    }
}
