//! The catalog product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, Slug};
use super::price::{Money, discount_percent};

/// Stock level below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// An immutable catalog product.
///
/// The serialized form uses camelCase field names and is also the snapshot
/// format embedded in persisted cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier, unique across the catalog.
    pub id: ProductId,
    /// URL-safe identifier, unique across the catalog.
    pub slug: Slug,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Current unit price.
    pub price: Money,
    /// Price before discount. Only meaningful when greater than `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Lowercase search keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the product was added to the catalog.
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub most_common: bool,
    /// Orderable quantity ceiling.
    pub stock: u32,
}

impl Product {
    /// Whether the product is sold below its original price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Whole-percent discount, if the product is discounted.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| discount_percent(original, self.price))
    }

    /// Availability bucket shown on product cards.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        match self.stock {
            0 => StockStatus::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockStatus::LowStock(n),
            n => StockStatus::InStock(n),
        }
    }
}

/// Availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    InStock(u32),
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units left.
    LowStock(u32),
    OutOfStock,
}

impl StockStatus {
    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ROSE_JSON: &str = r#"{
        "id": "1",
        "name": "Red Rose Bouquet",
        "slug": "red-rose-bouquet",
        "description": "Classic red roses arranged beautifully.",
        "price": 49.99,
        "originalPrice": 69.99,
        "tags": ["roses", "romantic", "classic"],
        "addedDate": "2024-11-10T00:00:00Z",
        "bestSeller": true,
        "category": "Roses",
        "stock": 25
    }"#;

    fn rose() -> Product {
        serde_json::from_str(ROSE_JSON).unwrap()
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let product = rose();
        assert_eq!(product.id, ProductId::new("1"));
        assert_eq!(product.slug, Slug::new("red-rose-bouquet"));
        assert_eq!(product.price, Money::from_cents(4999));
        assert_eq!(product.original_price, Some(Money::from_cents(6999)));
        assert!(product.best_seller);
        // Absent flag defaults to false
        assert!(!product.most_common);
    }

    #[test]
    fn test_serialize_round_trip() {
        let product = rose();
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"originalPrice\":69.99"));
        assert!(json.contains("\"addedDate\""));
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_discount() {
        let mut product = rose();
        assert!(product.is_discounted());
        assert_eq!(product.discount_percent(), Some(29));

        product.original_price = Some(product.price);
        assert!(!product.is_discounted());
        assert_eq!(product.discount_percent(), None);

        product.original_price = None;
        assert!(!product.is_discounted());
    }

    #[test]
    fn test_stock_status() {
        let mut product = rose();
        assert_eq!(product.stock_status(), StockStatus::InStock(25));

        product.stock = 9;
        assert_eq!(product.stock_status(), StockStatus::LowStock(9));
        assert!(product.stock_status().is_available());

        product.stock = 0;
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
        assert!(!product.stock_status().is_available());
    }
}
