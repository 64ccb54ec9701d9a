//! Favorites commands.
//!
//! # Usage
//!
//! ```bash
//! greenshop favorites toggle tulip-paradise
//! greenshop favorites list
//! ```

use greenshop_storefront::Result;
use greenshop_storefront::state::Storefront;

use super::product_row;

/// Print favorite products in the order they were added.
pub fn list(storefront: &Storefront) {
    let products = storefront.favorite_products();
    if products.is_empty() {
        println!("No favorites yet.");
        return;
    }

    println!("Favorites ({})", products.len());
    for product in products {
        println!("  {}  [{}]", product_row(product), product.slug);
    }
}

/// Add a product to favorites.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn add(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if storefront.favorites_mut().add(&product.id) {
        println!("Added {} to favorites.", product.name);
    } else {
        println!("{} is already a favorite.", product.name);
    }
    Ok(())
}

/// Remove a product from favorites.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn remove(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if storefront.favorites_mut().remove(&product.id) {
        println!("Removed {} from favorites.", product.name);
    } else {
        println!("{} is not a favorite.", product.name);
    }
    Ok(())
}

/// Flip a product's favorite status.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn toggle(storefront: &mut Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?.clone();
    if storefront.favorites_mut().toggle(&product.id) {
        println!("Added {} to favorites.", product.name);
    } else {
        println!("Removed {} from favorites.", product.name);
    }
    Ok(())
}

pub fn clear(storefront: &mut Storefront) {
    storefront.favorites_mut().clear();
    println!("Favorites cleared.");
}
