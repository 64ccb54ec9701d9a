//! Favorites (wishlist) engine.
//!
//! Favorites are an ordered set of product ids. Only ids are persisted;
//! products are resolved against the catalog when listed. It follows the same
//! lifecycle as the cart: see [`crate::cart`].

use std::collections::HashSet;
use std::sync::Arc;

use greenshop_core::{Product, ProductId};
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::persistence::{FAVORITES_KEY, KeyValueStore, Lifecycle, Slice};

/// The favorites engine.
pub struct FavoritesStore {
    ids: Vec<ProductId>,
    slice: Slice<Vec<ProductId>>,
    lifecycle: Lifecycle,
    dirty: bool,
}

impl FavoritesStore {
    /// Create an empty, uninitialized favorites set persisted in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ids: Vec::new(),
            slice: Slice::new(FAVORITES_KEY, store),
            lifecycle: Lifecycle::Uninitialized,
            dirty: false,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Load the stored favorites and become ready.
    ///
    /// Repeated ids keep their first position. Ids that no longer resolve to a
    /// product are kept; they are skipped by [`Self::products`]. Calling this
    /// on a ready set does nothing.
    #[instrument(skip_all)]
    pub fn hydrate(&mut self) {
        if self.lifecycle == Lifecycle::Ready {
            return;
        }
        self.lifecycle = Lifecycle::Ready;

        if self.dirty {
            info!(
                count = self.ids.len(),
                "Favorites changed before hydration, keeping in-memory favorites"
            );
            self.dirty = false;
            self.persist();
            return;
        }

        let mut seen = HashSet::new();
        self.ids = self
            .slice
            .load()
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        info!(count = self.ids.len(), "Favorites hydrated");
    }

    /// Add a product id. Returns `false` if it was already a favorite.
    pub fn add(&mut self, product_id: &ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.ids.push(product_id.clone());
        debug!(%product_id, "Added favorite");
        self.commit();
        true
    }

    /// Remove a product id. Returns `false` if it was not a favorite.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| id != product_id);
        if self.ids.len() == before {
            return false;
        }
        debug!(%product_id, "Removed favorite");
        self.commit();
        true
    }

    /// Flip membership. Returns whether the product is a favorite afterwards.
    pub fn toggle(&mut self, product_id: &ProductId) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.add(product_id)
        }
    }

    pub fn clear(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.ids.clear();
        debug!("Cleared favorites");
        self.commit();
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.ids.contains(product_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorite ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Resolve favorites against `catalog`, in order, skipping unknown ids.
    #[must_use]
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.ids.iter().filter_map(|id| catalog.by_id(id)).collect()
    }

    fn commit(&mut self) {
        match self.lifecycle {
            Lifecycle::Ready => self.persist(),
            Lifecycle::Uninitialized => self.dirty = true,
        }
    }

    fn persist(&self) {
        self.slice.save(&self.ids);
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("ids", &self.ids)
            .field("lifecycle", &self.lifecycle)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
