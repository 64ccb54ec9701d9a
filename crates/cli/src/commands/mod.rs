//! Subcommand implementations and shared terminal formatting.

// Command output is written to stdout
#![allow(clippy::print_stdout)]

pub mod cart;
pub mod favorites;
pub mod products;
pub mod search;

use greenshop_core::{Product, StockStatus};

/// One-line listing of a product: name, price, discount and availability.
pub fn product_row(product: &Product) -> String {
    let mut row = format!("{:<26} {:>8}", product.name, product.price.display());
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent())
    {
        row.push_str(&format!("  (was {original}, -{percent}%)"));
    }
    match product.stock_status() {
        StockStatus::InStock(_) => {}
        StockStatus::LowStock(n) => row.push_str(&format!("  only {n} left")),
        StockStatus::OutOfStock => row.push_str("  out of stock"),
    }
    row
}

/// Availability as shown on the product page.
pub fn stock_label(product: &Product) -> String {
    match product.stock_status() {
        StockStatus::InStock(n) => format!("In stock ({n})"),
        StockStatus::LowStock(n) => format!("Low stock ({n} left)"),
        StockStatus::OutOfStock => "Out of stock".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use greenshop_storefront::catalog::Catalog;

    fn bundled(slug: &str) -> Product {
        Catalog::bundled().unwrap().by_slug(slug).unwrap().clone()
    }

    #[test]
    fn test_product_row_discounted() {
        let row = product_row(&bundled("red-rose-bouquet"));
        assert!(row.starts_with("Red Rose Bouquet"));
        assert!(row.contains("$49.99"));
        assert!(row.contains("(was $69.99, -29%)"));
        assert!(!row.contains("left"));
    }

    #[test]
    fn test_product_row_low_stock() {
        let row = product_row(&bundled("protea-power"));
        assert!(row.contains("only 8 left"));
        assert!(!row.contains("was"));
    }

    #[test]
    fn test_stock_label() {
        let mut product = bundled("daisy-chain");
        assert_eq!(stock_label(&product), "In stock (35)");
        product.stock = 0;
        assert_eq!(stock_label(&product), "Out of stock");
    }
}
