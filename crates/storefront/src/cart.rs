//! Shopping cart engine.
//!
//! The cart is an ordered list of line items, one per product, kept in
//! first-add order. Totals are derived from the lines on every read. Every
//! mutation is written through to the cart slice once the engine is ready.
//!
//! # Lifecycle
//!
//! A new `CartStore` is uninitialized: it works on an empty cart and does not
//! persist. [`CartStore::hydrate`] loads the stored cart and makes the engine
//! ready. If the cart was changed before hydration, those changes win: the
//! stored cart is discarded and the in-memory cart is written over it.

use std::collections::HashMap;
use std::sync::Arc;

use greenshop_core::{Money, Product, ProductId};
use rust_decimal::Decimal;
use rust_decimal::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::persistence::{CART_KEY, KeyValueStore, Lifecycle, Slice};

/// Sales tax applied to the subtotal.
pub const TAX_RATE: Decimal = dec!(0.10);

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(10_000);

/// Shipping charged on non-empty carts below the free shipping threshold.
pub const FLAT_SHIPPING: Money = Money::from_cents(1_000);

/// How the cart treats a product's stock level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockPolicy {
    /// Never let `add_item`, `set_quantity` or `increment_quantity` raise a
    /// line above the product's stock.
    #[default]
    Enforce,
    /// Accept any quantity; stock limits are left to the caller.
    Ignore,
}

impl StockPolicy {
    /// Parse from a configuration value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Some(Self::Enforce),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enforce => "enforce",
            Self::Ignore => "ignore",
        }
    }
}

/// One product and its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product as it was added.
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// Persisted form of a line. The quantity is signed so that bad stored
/// values can be read and then dropped during normalization.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    product: Product,
    quantity: i64,
}

impl From<&CartLine> for StoredLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product.clone(),
            quantity: i64::from(line.quantity),
        }
    }
}

/// Snapshot of all cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    /// Sum of quantities across all lines.
    pub item_count: u64,
    /// Number of distinct products.
    pub line_count: usize,
}

/// Shipping charged for a given subtotal.
#[must_use]
pub fn shipping_for(subtotal: Money) -> Money {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else if subtotal > Money::ZERO {
        FLAT_SHIPPING
    } else {
        Money::ZERO
    }
}

/// The cart engine.
pub struct CartStore {
    lines: Vec<CartLine>,
    policy: StockPolicy,
    slice: Slice<Vec<StoredLine>>,
    lifecycle: Lifecycle,
    /// Whether the cart changed while uninitialized.
    dirty: bool,
}

impl CartStore {
    /// Create an empty, uninitialized cart persisted in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, policy: StockPolicy) -> Self {
        Self {
            lines: Vec::new(),
            policy,
            slice: Slice::new(CART_KEY, store),
            lifecycle: Lifecycle::Uninitialized,
            dirty: false,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Load the stored cart and become ready.
    ///
    /// Stored lines are normalized: lines with a quantity below 1 are dropped,
    /// repeated products are merged into their first line, and product
    /// snapshots are refreshed from `catalog` when the product still exists.
    /// Lines priced below zero, or whose totals overflow, are dropped.
    /// Stored quantities are not clamped to stock.
    ///
    /// Calling this on a ready cart does nothing.
    #[instrument(skip_all)]
    pub fn hydrate(&mut self, catalog: &Catalog) {
        if self.lifecycle == Lifecycle::Ready {
            return;
        }
        self.lifecycle = Lifecycle::Ready;

        if self.dirty {
            info!(
                lines = self.lines.len(),
                "Cart changed before hydration, keeping in-memory cart"
            );
            self.dirty = false;
            self.persist();
            return;
        }

        let stored = self.slice.load();
        let stored_count = stored.len();
        self.lines = normalize(stored, catalog);
        info!(
            lines = self.lines.len(),
            dropped = stored_count.saturating_sub(self.lines.len()),
            "Cart hydrated"
        );
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// Adding zero units does nothing. Under [`StockPolicy::Enforce`] the line
    /// never grows past `product.stock`, and an out-of-stock product is not
    /// added at all.
    ///
    /// Returns the line's quantity afterwards (0 if there is no line).
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> u32 {
        if quantity == 0 {
            return self.quantity_of(&product.id);
        }

        let policy = self.policy;
        let new_quantity = if let Some(line) = self.line_mut(&product.id) {
            let before = line.quantity;
            let wanted = before.saturating_add(quantity);
            line.quantity = match policy {
                // Never shrink a line that was already above stock
                StockPolicy::Enforce => wanted.min(product.stock.max(before)),
                StockPolicy::Ignore => wanted,
            };
            if line.quantity == before {
                return before;
            }
            line.quantity
        } else {
            let allowed = match policy {
                StockPolicy::Enforce => quantity.min(product.stock),
                StockPolicy::Ignore => quantity,
            };
            if allowed == 0 {
                debug!(product_id = %product.id, "Product out of stock, not added");
                return 0;
            }
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: allowed,
            });
            allowed
        };

        debug!(product_id = %product.id, quantity = new_quantity, "Added to cart");
        self.commit();
        new_quantity
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product.id != product_id);
        let removed = self.lines.len() != before;
        if removed {
            debug!(%product_id, "Removed from cart");
            self.commit();
        }
        removed
    }

    /// Set the line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Products not in the cart
    /// are ignored. Under [`StockPolicy::Enforce`] the quantity is clamped to
    /// the product's stock, and a clamp to zero removes the line.
    ///
    /// Returns the line's quantity afterwards (0 if there is no line).
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> u32 {
        if quantity <= 0 {
            self.remove_item(product_id);
            return 0;
        }

        let policy = self.policy;
        let Some(line) = self.line_mut(product_id) else {
            return 0;
        };

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let allowed = match policy {
            StockPolicy::Enforce => requested.min(line.product.stock),
            StockPolicy::Ignore => requested,
        };
        if allowed == 0 {
            self.remove_item(product_id);
            return 0;
        }
        if line.quantity == allowed {
            return allowed;
        }

        line.quantity = allowed;
        debug!(%product_id, quantity = allowed, "Set cart quantity");
        self.commit();
        allowed
    }

    /// Add one unit to an existing line.
    ///
    /// Products not in the cart are ignored. Under [`StockPolicy::Enforce`] a
    /// line already at (or above) stock is left unchanged.
    ///
    /// Returns the line's quantity afterwards (0 if there is no line).
    pub fn increment_quantity(&mut self, product_id: &ProductId) -> u32 {
        let policy = self.policy;
        let Some(line) = self.line_mut(product_id) else {
            return 0;
        };

        if policy == StockPolicy::Enforce && line.quantity >= line.product.stock {
            return line.quantity;
        }

        line.quantity = line.quantity.saturating_add(1);
        let quantity = line.quantity;
        debug!(%product_id, quantity, "Incremented cart quantity");
        self.commit();
        quantity
    }

    /// Remove one unit from a line, removing the line when it reaches zero.
    ///
    /// Products not in the cart are ignored.
    ///
    /// Returns the line's quantity afterwards (0 if there is no line).
    pub fn decrement_quantity(&mut self, product_id: &ProductId) -> u32 {
        let Some(line) = self.line_mut(product_id) else {
            return 0;
        };

        if line.quantity <= 1 {
            self.remove_item(product_id);
            return 0;
        }

        line.quantity -= 1;
        let quantity = line.quantity;
        debug!(%product_id, quantity, "Decremented cart quantity");
        self.commit();
        quantity
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        debug!("Cleared cart");
        self.commit();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Quantity of a product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn tax(&self) -> Money {
        self.subtotal().scaled(TAX_RATE)
    }

    #[must_use]
    pub fn shipping(&self) -> Money {
        shipping_for(self.subtotal())
    }

    #[must_use]
    pub fn total(&self) -> Money {
        let subtotal = self.subtotal();
        subtotal + subtotal.scaled(TAX_RATE) + shipping_for(subtotal)
    }

    /// How much more to spend for free shipping (zero for empty carts and
    /// carts that already qualify).
    #[must_use]
    pub fn amount_until_free_shipping(&self) -> Money {
        let subtotal = self.subtotal();
        if subtotal > Money::ZERO && subtotal < FREE_SHIPPING_THRESHOLD {
            FREE_SHIPPING_THRESHOLD - subtotal
        } else {
            Money::ZERO
        }
    }

    /// All totals at once.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let tax = subtotal.scaled(TAX_RATE);
        let shipping = shipping_for(subtotal);
        CartSummary {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            item_count: self.item_count(),
            line_count: self.lines.len(),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
    }

    /// Record a change: persist when ready, remember it otherwise.
    fn commit(&mut self) {
        match self.lifecycle {
            Lifecycle::Ready => self.persist(),
            Lifecycle::Uninitialized => self.dirty = true,
        }
    }

    fn persist(&self) {
        let stored: Vec<StoredLine> = self.lines.iter().map(StoredLine::from).collect();
        self.slice.save(&stored);
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("policy", &self.policy)
            .field("lifecycle", &self.lifecycle)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Turn stored lines into valid cart lines.
fn normalize(stored: Vec<StoredLine>, catalog: &Catalog) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    let mut positions: HashMap<ProductId, usize> = HashMap::new();

    for StoredLine { product, quantity } in stored {
        if quantity < 1 {
            debug!(product_id = %product.id, quantity, "Dropping stored line with invalid quantity");
            continue;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(line) = positions
            .get(&product.id)
            .and_then(|&index| lines.get_mut(index))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            continue;
        }

        let product = catalog.by_id(&product.id).cloned().unwrap_or(product);
        positions.insert(product.id.clone(), lines.len());
        lines.push(CartLine { product, quantity });
    }

    // Snapshots of products no longer in the catalog are unvalidated
    let mut subtotal = Money::ZERO;
    lines.retain(|line| {
        if line.product.price < Money::ZERO {
            warn!(
                product_id = %line.product.id,
                price = %line.product.price,
                "Dropping stored line with negative price"
            );
            return false;
        }
        match line
            .product
            .price
            .checked_mul(line.quantity)
            .and_then(|line_total| subtotal.checked_add(line_total))
        {
            Some(running) => {
                subtotal = running;
                true
            }
            None => {
                warn!(
                    product_id = %line.product.id,
                    quantity = line.quantity,
                    "Dropping stored line whose total overflows"
                );
                false
            }
        }
    });

    lines
}
