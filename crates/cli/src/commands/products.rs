//! Catalog listing commands.
//!
//! # Usage
//!
//! ```bash
//! greenshop products --collection discounts
//! greenshop show lavender-dreams
//! ```

use greenshop_storefront::Result;
use greenshop_storefront::catalog::Collection;
use greenshop_storefront::images;
use greenshop_storefront::state::Storefront;

use super::{product_row, stock_label};

/// Print every product in a collection.
pub fn list(storefront: &Storefront, collection: Collection) {
    let products = storefront.catalog().collection(collection);

    println!("{} ({})", collection.title(), products.len());
    for product in products {
        let marker = if storefront.cart().is_in_cart(&product.id) {
            "*"
        } else {
            " "
        };
        println!("{marker} {}  [{}]", product_row(product), product.slug);
    }
}

/// Print the detail view of one product.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown slug.
pub fn show(storefront: &Storefront, slug: &str) -> Result<()> {
    let product = storefront.product(slug)?;

    println!("{}", product.name);
    println!("{}", product.description);
    println!();
    println!("Category:  {}", product.category);
    match (product.original_price, product.discount_percent()) {
        (Some(original), Some(percent)) => println!(
            "Price:     {} (was {original}, save {percent}%)",
            product.price
        ),
        _ => println!("Price:     {}", product.price),
    }
    println!("Stock:     {}", stock_label(product));
    if !product.tags.is_empty() {
        println!("Tags:      {}", product.tags.join(", "));
    }
    println!("Image:     {}", images::large_image_url(product.slug.as_str()));

    let in_cart = storefront.cart().quantity_of(&product.id);
    if in_cart > 0 {
        println!("In cart:   {in_cart}");
    }
    if storefront.favorites().contains(&product.id) {
        println!("Favorite:  yes");
    }
    Ok(())
}
