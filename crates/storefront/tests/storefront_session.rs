//! Integration tests for a file-backed storefront session.
//!
//! These tests open storefronts over a temporary data directory, the same way
//! the CLI does, and verify that cart and favorites survive a restart.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use greenshop_core::Money;
use greenshop_storefront::cart::StockPolicy;
use greenshop_storefront::catalog::Catalog;
use greenshop_storefront::config::StorefrontConfig;
use greenshop_storefront::persistence::{CART_KEY, FAVORITES_KEY, FileStore, KeyValueStore};
use greenshop_storefront::search::SearchState;
use greenshop_storefront::state::Storefront;
use tempfile::TempDir;

fn config(dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    }
}

fn open(dir: &TempDir) -> Storefront {
    Storefront::open(&config(dir.path())).unwrap()
}

// =============================================================================
// Persistence Across Sessions
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir);
    let rose = first.product("red-rose-bouquet").unwrap().clone();
    let daisy = first.product("daisy-chain").unwrap().clone();
    first.cart_mut().add_item(&rose, 1);
    first.cart_mut().add_item(&daisy, 3);
    first.cart_mut().increment_quantity(&rose.id);
    let summary = first.cart().summary();
    drop(first);

    let second = open(&dir);
    assert_eq!(second.cart().line_count(), 2);
    assert_eq!(second.cart().quantity_of(&rose.id), 2);
    assert_eq!(second.cart().quantity_of(&daisy.id), 3);
    assert_eq!(second.cart().summary(), summary);
}

#[test]
fn test_favorites_survive_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir);
    let tulip = first.product("tulip-paradise").unwrap().id.clone();
    let lily = first.product("lily-luxury").unwrap().id.clone();
    first.favorites_mut().toggle(&tulip);
    first.favorites_mut().toggle(&lily);
    first.favorites_mut().toggle(&tulip);
    drop(first);

    let second = open(&dir);
    assert_eq!(second.favorites().ids(), &[lily]);
}

#[test]
fn test_persisted_layout() {
    let dir = TempDir::new().unwrap();
    let mut storefront = open(&dir);
    let rose = storefront.product("red-rose-bouquet").unwrap().clone();
    storefront.cart_mut().add_item(&rose, 2);
    storefront.favorites_mut().add(&rose.id);

    let store = FileStore::new(dir.path());
    let cart: serde_json::Value =
        serde_json::from_str(&store.get(CART_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(cart[0]["quantity"], 2);
    assert_eq!(cart[0]["product"]["slug"], "red-rose-bouquet");
    assert_eq!(cart[0]["product"]["originalPrice"], 69.99);

    assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some(r#"["1"]"#));
}

#[test]
fn test_corrupt_files_start_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("greenshop-cart.json"), "[{\"product\":").unwrap();
    std::fs::write(dir.path().join("greenshop-favorites.json"), "42").unwrap();

    let mut storefront = open(&dir);
    assert!(storefront.cart().is_empty());
    assert!(storefront.favorites().is_empty());

    // The next mutation overwrites the corrupt slice
    let daisy = storefront.product("daisy-chain").unwrap().clone();
    storefront.cart_mut().add_item(&daisy, 1);
    drop(storefront);

    assert_eq!(open(&dir).cart().quantity_of(&daisy.id), 1);
}

#[test]
fn test_checkout_persists_empty_cart() {
    let dir = TempDir::new().unwrap();
    let mut storefront = open(&dir);
    let orchid = storefront.product("white-orchid-elegance").unwrap().clone();
    storefront.cart_mut().add_item(&orchid, 2);

    let receipt = storefront.checkout().unwrap();
    assert_eq!(receipt.summary.subtotal, Money::from_cents(15_998));
    assert_eq!(receipt.summary.shipping, Money::ZERO);
    drop(storefront);

    assert!(open(&dir).cart().is_empty());
}

// =============================================================================
// Hydration Ordering
// =============================================================================

#[test]
fn test_changes_before_hydrate_overwrite_stored_state() {
    let dir = TempDir::new().unwrap();
    {
        let mut earlier = open(&dir);
        let lily = earlier.product("lily-luxury").unwrap().clone();
        earlier.cart_mut().add_item(&lily, 4);
    }

    let catalog = Arc::new(Catalog::bundled().unwrap());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let mut storefront = Storefront::new(Arc::clone(&catalog), store, StockPolicy::Enforce);

    let protea = catalog.by_slug("protea-power").unwrap().clone();
    storefront.cart_mut().add_item(&protea, 1);
    storefront.hydrate();

    assert_eq!(storefront.cart().line_count(), 1);
    assert_eq!(storefront.cart().quantity_of(&protea.id), 1);
    drop(storefront);

    let reopened = open(&dir);
    assert_eq!(reopened.cart().line_count(), 1);
    assert!(reopened.cart().is_in_cart(&protea.id));
}

// =============================================================================
// Stock Policy
// =============================================================================

#[test]
fn test_stock_policy_from_config() {
    let dir = TempDir::new().unwrap();
    let protea_stock = 8;

    let mut enforced = open(&dir);
    let protea = enforced.product("protea-power").unwrap().clone();
    assert_eq!(protea.stock, protea_stock);
    assert_eq!(enforced.cart_mut().add_item(&protea, 20), protea_stock);
    enforced.cart_mut().clear();
    drop(enforced);

    let mut ignored = Storefront::open(&StorefrontConfig {
        stock_policy: StockPolicy::Ignore,
        ..config(dir.path())
    })
    .unwrap();
    assert_eq!(ignored.cart_mut().add_item(&protea, 20), 20);
}

// =============================================================================
// Catalog And Search
// =============================================================================

#[test]
fn test_custom_catalog_path() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"[{
            "id": "cactus-1",
            "slug": "desert-bloom",
            "name": "Desert Bloom",
            "description": "A flowering cactus.",
            "category": "Succulents",
            "price": 15.5,
            "tags": ["cactus"],
            "addedDate": "2025-01-15T00:00:00Z",
            "stock": 3
        }]"#,
    )
    .unwrap();

    let storefront = Storefront::open(&StorefrontConfig {
        catalog_path: Some(catalog_path),
        ..config(dir.path())
    })
    .unwrap();
    assert_eq!(storefront.catalog().len(), 1);
    assert_eq!(
        storefront.product("desert-bloom").unwrap().price,
        Money::from_cents(1550)
    );
}

#[test]
fn test_missing_catalog_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = Storefront::open(&StorefrontConfig {
        catalog_path: Some(dir.path().join("missing.json")),
        ..config(dir.path())
    });
    assert!(matches!(
        result,
        Err(greenshop_storefront::StorefrontError::Catalog(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_search_session_over_storefront_catalog() {
    let dir = TempDir::new().unwrap();
    let storefront = Storefront::open(&StorefrontConfig {
        search_debounce: Duration::from_millis(100),
        ..config(dir.path())
    })
    .unwrap();

    let mut session = storefront.search_session();
    session.submit("lil");
    session.submit("lily");

    let SearchState::Ready(outcome) = session.settled().await else {
        panic!("search did not settle");
    };
    let names: Vec<&str> = outcome.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Lily Luxury", "Calla Lily Class"]);
}
