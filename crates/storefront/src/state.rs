//! Storefront session state.
//!
//! A [`Storefront`] owns the shared catalog and the cart and favorites
//! engines, both persisted in one key-value store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use greenshop_core::Product;
use tracing::{info, instrument};

use crate::cart::{CartLine, CartStore, CartSummary, StockPolicy};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::favorites::FavoritesStore;
use crate::persistence::{FileStore, KeyValueStore};
use crate::search::SearchSession;

/// Snapshot of a cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
}

/// One shopper's storefront: catalog, cart and favorites.
pub struct Storefront {
    catalog: Arc<Catalog>,
    cart: CartStore,
    favorites: FavoritesStore,
    search_debounce: Duration,
}

impl Storefront {
    /// Open a storefront from configuration.
    ///
    /// Loads the configured catalog (or the bundled one), persists state
    /// under `config.data_dir`, and hydrates the cart and favorites.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Catalog` if the catalog cannot be loaded.
    #[instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
    pub fn open(config: &StorefrontConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::bundled()?,
        };
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));

        let mut storefront = Self::new(Arc::new(catalog), store, config.stock_policy)
            .with_search_debounce(config.search_debounce);
        storefront.hydrate();

        info!(
            products = storefront.catalog.len(),
            cart_lines = storefront.cart.line_count(),
            favorites = storefront.favorites.count(),
            "Storefront opened"
        );
        Ok(storefront)
    }

    /// Create an unhydrated storefront over an arbitrary store.
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn KeyValueStore>, policy: StockPolicy) -> Self {
        Self {
            catalog,
            cart: CartStore::new(Arc::clone(&store), policy),
            favorites: FavoritesStore::new(store),
            search_debounce: crate::search::DEFAULT_DEBOUNCE,
        }
    }

    /// Set the debounce delay used by [`Self::search_session`].
    #[must_use]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Load persisted cart and favorites. Safe to call more than once.
    pub fn hydrate(&mut self) {
        self.cart.hydrate(&self.catalog);
        self.favorites.hydrate();
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub const fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    /// Look up a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if no product has this slug.
    pub fn product(&self, slug: &str) -> Result<&Product> {
        self.catalog
            .by_slug(slug)
            .ok_or_else(|| StorefrontError::NotFound(format!("product '{slug}'")))
    }

    /// Favorite products in favorites order, skipping unknown ids.
    #[must_use]
    pub fn favorite_products(&self) -> Vec<&Product> {
        self.favorites.products(&self.catalog)
    }

    /// A debounced search session over this storefront's catalog.
    #[must_use]
    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(Arc::clone(&self.catalog), self.search_debounce)
    }

    /// Place a stub order: snapshot the cart and empty it.
    ///
    /// Returns `None` if the cart is empty.
    pub fn checkout(&mut self) -> Option<CheckoutReceipt> {
        if self.cart.is_empty() {
            return None;
        }

        let receipt = CheckoutReceipt {
            placed_at: Utc::now(),
            lines: self.cart.lines().to_vec(),
            summary: self.cart.summary(),
        };
        self.cart.clear();

        info!(
            items = receipt.summary.item_count,
            total = %receipt.summary.total,
            "Checkout complete"
        );
        Some(receipt)
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::{CART_KEY, MemoryStore};
    use greenshop_core::Money;

    fn storefront(store: &Arc<MemoryStore>) -> Storefront {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let mut storefront = Storefront::new(catalog, store.clone(), StockPolicy::Enforce);
        storefront.hydrate();
        storefront
    }

    #[test]
    fn test_product_lookup() {
        let storefront = storefront(&Arc::new(MemoryStore::new()));
        assert_eq!(
            storefront.product("red-rose-bouquet").unwrap().name,
            "Red Rose Bouquet"
        );
        assert!(storefront.product("snapdragon").unwrap_err().is_not_found());
    }

    #[test]
    fn test_checkout_clears_cart() {
        let store = Arc::new(MemoryStore::new());
        let mut storefront = storefront(&store);
        let rose = storefront.product("red-rose-bouquet").unwrap().clone();
        storefront.cart_mut().add_item(&rose, 2);

        let receipt = storefront.checkout().unwrap();
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.summary.subtotal, Money::from_cents(9998));
        assert!(storefront.cart().is_empty());
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut storefront = storefront(&Arc::new(MemoryStore::new()));
        assert!(storefront.checkout().is_none());
    }

    #[test]
    fn test_favorite_products() {
        let mut storefront = storefront(&Arc::new(MemoryStore::new()));
        let tulip = storefront.product("tulip-paradise").unwrap().id.clone();
        storefront.favorites_mut().toggle(&tulip);

        let names: Vec<&str> = storefront
            .favorite_products()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Tulip Paradise"]);
    }

    #[test]
    fn test_search_session_uses_configured_delay() {
        let storefront = storefront(&Arc::new(MemoryStore::new()))
            .with_search_debounce(Duration::from_millis(20));
        let session = storefront.search_session();
        assert_eq!(session.delay(), Duration::from_millis(20));
    }
}
