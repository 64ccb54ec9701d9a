//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! greenshop cart add red-rose-bouquet -q 2
//! greenshop cart set red-rose-bouquet 5
//! greenshop cart dec red-rose-bouquet
//! greenshop cart show
//! greenshop cart checkout
//! ```

use greenshop_core::Money;
use greenshop_storefront::Result;
use greenshop_storefront::cart::CartStore;
use greenshop_storefront::state::Storefront;

/// Print the cart lines and totals.
pub fn show(storefront: &Storefront) {
    print!("{}", render(storefront.cart()));
}

/// Add units of a product.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn add(storefront: &mut Storefront, slug: &str, quantity: u32) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    let before = storefront.cart().quantity_of(&product.id);
    let after = storefront.cart_mut().add_item(&product, quantity);

    if after == 0 && !product.stock_status().is_available() {
        println!("{} is out of stock.", product.name);
    } else if after.saturating_sub(before) < quantity {
        println!(
            "Only {} of {} available; cart now has {after}.",
            product.stock, product.name
        );
    } else {
        println!("Added {quantity} x {}; cart now has {after}.", product.name);
    }
    Ok(())
}

/// Remove a product entirely.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn remove(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if storefront.cart_mut().remove_item(&product.id) {
        println!("Removed {} from the cart.", product.name);
    } else {
        println!("{} is not in the cart.", product.name);
    }
    Ok(())
}

/// Set a product's quantity exactly.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn set(storefront: &mut Storefront, slug: &str, quantity: i64) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if !storefront.cart().is_in_cart(&product.id) {
        println!("{} is not in the cart.", product.name);
        return Ok(());
    }

    match storefront.cart_mut().set_quantity(&product.id, quantity) {
        0 => println!("Removed {} from the cart.", product.name),
        n if i64::from(n) < quantity => println!(
            "Only {} of {} available; cart now has {n}.",
            product.stock, product.name
        ),
        n => println!("{} quantity set to {n}.", product.name),
    }
    Ok(())
}

/// Add one unit of a product already in the cart.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn increment(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    let before = storefront.cart().quantity_of(&product.id);
    if before == 0 {
        println!("{} is not in the cart.", product.name);
        return Ok(());
    }

    let after = storefront.cart_mut().increment_quantity(&product.id);
    if after == before {
        println!("No more {} in stock; cart has {after}.", product.name);
    } else {
        println!("{} quantity is now {after}.", product.name);
    }
    Ok(())
}

/// Remove one unit of a product.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn decrement(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if !storefront.cart().is_in_cart(&product.id) {
        println!("{} is not in the cart.", product.name);
        return Ok(());
    }

    match storefront.cart_mut().decrement_quantity(&product.id) {
        0 => println!("Removed {} from the cart.", product.name),
        n => println!("{} quantity is now {n}.", product.name),
    }
    Ok(())
}

pub fn clear(storefront: &mut Storefront) {
    storefront.cart_mut().clear();
    println!("Cart cleared.");
}

/// Place the stub order.
pub fn checkout(storefront: &mut Storefront) {
    let Some(receipt) = storefront.checkout() else {
        println!("Your cart is empty.");
        return;
    };

    println!(
        "Order placed {} for {} item(s).",
        receipt.placed_at.format("%Y-%m-%d %H:%M UTC"),
        receipt.summary.item_count
    );
    println!("Total charged: {}", receipt.summary.total);
    println!("(No payment was taken; this storefront is a demo.)");
}

/// Cart contents and totals as printed by `cart show`.
pub fn render(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in cart.lines() {
        out.push_str(&format!(
            "{:>3} x {:<26} {:>9}  [{}]\n",
            line.quantity,
            line.product.name,
            line.line_total().display(),
            line.product.slug
        ));
    }

    let summary = cart.summary();
    out.push('\n');
    out.push_str(&format!("Subtotal ({} items) {:>12}\n", summary.item_count, summary.subtotal));
    out.push_str(&format!("Tax (10%)          {:>12}\n", summary.tax));
    let shipping = if summary.shipping.is_zero() {
        "FREE".to_string()
    } else {
        summary.shipping.display()
    };
    out.push_str(&format!("Shipping           {shipping:>12}\n"));
    out.push_str(&format!("Total              {:>12}\n", summary.total));

    let remaining = cart.amount_until_free_shipping();
    if remaining > Money::ZERO {
        out.push_str(&format!("Add {remaining} more for free shipping.\n"));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use greenshop_storefront::cart::StockPolicy;
    use greenshop_storefront::catalog::Catalog;
    use greenshop_storefront::persistence::MemoryStore;

    use super::*;

    fn storefront() -> Storefront {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let mut storefront =
            Storefront::new(catalog, Arc::new(MemoryStore::new()), StockPolicy::Enforce);
        storefront.hydrate();
        storefront
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(storefront().cart()), "Your cart is empty.\n");
    }

    #[test]
    fn test_render_totals_and_free_shipping_hint() {
        let mut storefront = storefront();
        add(&mut storefront, "daisy-chain", 2).unwrap();

        let out = render(storefront.cart());
        assert!(out.contains("2 x Daisy Chain"));
        assert!(out.contains("$59.98"));
        assert!(out.contains("$6.00"));
        assert!(out.contains("$10.00"));
        assert!(out.contains("$75.98"));
        assert!(out.contains("Add $40.02 more for free shipping."));
    }

    #[test]
    fn test_render_free_shipping() {
        let mut storefront = storefront();
        add(&mut storefront, "white-orchid-elegance", 2).unwrap();

        let out = render(storefront.cart());
        assert!(out.contains("FREE"));
        assert!(!out.contains("more for free shipping"));
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let mut storefront = storefront();
        assert!(add(&mut storefront, "snapdragon", 1).unwrap_err().is_not_found());
        assert!(set(&mut storefront, "snapdragon", 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_on_absent_product_does_not_add() {
        let mut storefront = storefront();
        set(&mut storefront, "daisy-chain", 3).unwrap();
        assert!(storefront.cart().is_empty());
    }
}
