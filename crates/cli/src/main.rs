//! GreenShop CLI - Browse the catalog and manage a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally by collection
//! greenshop products --collection best-sellers
//!
//! # Search the catalog
//! greenshop search red rose
//!
//! # Manage the cart
//! greenshop cart add red-rose-bouquet -q 2
//! greenshop cart show
//! greenshop cart checkout
//!
//! # Manage favorites
//! greenshop favorites toggle tulip-paradise
//! ```
//!
//! # Commands
//!
//! - `products` - List a collection
//! - `show` - Product details
//! - `search` - Keyword search
//! - `cart` - Cart operations
//! - `favorites` - Favorites operations
//!
//! Configuration is read from `GREENSHOP_*` environment variables (see
//! `greenshop_storefront::config`). Logs go to stderr and are filtered with
//! `RUST_LOG`; set `GREENSHOP_LOG_FORMAT=json` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use greenshop_storefront::catalog::Collection;
use greenshop_storefront::config::StorefrontConfig;
use greenshop_storefront::state::Storefront;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "greenshop")]
#[command(author, version, about = "GreenShop terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in a collection
    Products {
        /// Collection (`all`, `best-sellers`, `discounts`, `most-common`, `recently-added`)
        #[arg(short, long, default_value = "all", value_parser = parse_collection)]
        collection: Collection,
    },
    /// Show product details
    Show {
        /// Product slug
        slug: String,
    },
    /// Search the catalog by keyword
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product slug
        slug: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product slug
        slug: String,
    },
    /// Set a product's quantity (0 or less removes it)
    Set {
        /// Product slug
        slug: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit of a product already in the cart
    Inc {
        /// Product slug
        slug: String,
    },
    /// Remove one unit of a product in the cart
    Dec {
        /// Product slug
        slug: String,
    },
    /// Empty the cart
    Clear,
    /// Place a (simulated) order and empty the cart
    Checkout,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite products
    List,
    /// Add a product to favorites
    Add {
        /// Product slug
        slug: String,
    },
    /// Remove a product from favorites
    Remove {
        /// Product slug
        slug: String,
    },
    /// Add or remove a product
    Toggle {
        /// Product slug
        slug: String,
    },
    /// Remove all favorites
    Clear,
}

fn parse_collection(s: &str) -> Result<Collection, String> {
    Collection::parse(s).ok_or_else(|| {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown collection '{s}' (expected one of: {})", names.join(", "))
    })
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greenshop=info,greenshop_storefront=info".into());

    // JSON logs for machine consumption, text otherwise; stdout stays for output
    let is_json =
        std::env::var("GREENSHOP_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> greenshop_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let mut storefront = Storefront::open(&config)?;

    match cli.command {
        Commands::Products { collection } => commands::products::list(&storefront, collection),
        Commands::Show { slug } => commands::products::show(&storefront, &slug)?,
        Commands::Search { query } => commands::search::run(&storefront, &query.join(" ")).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront),
            CartAction::Add { slug, quantity } => {
                commands::cart::add(&mut storefront, &slug, quantity)?;
            }
            CartAction::Remove { slug } => commands::cart::remove(&mut storefront, &slug)?,
            CartAction::Set { slug, quantity } => {
                commands::cart::set(&mut storefront, &slug, quantity)?;
            }
            CartAction::Inc { slug } => commands::cart::increment(&mut storefront, &slug)?,
            CartAction::Dec { slug } => commands::cart::decrement(&mut storefront, &slug)?,
            CartAction::Clear => commands::cart::clear(&mut storefront),
            CartAction::Checkout => commands::cart::checkout(&mut storefront),
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&storefront),
            FavoritesAction::Add { slug } => commands::favorites::add(&mut storefront, &slug)?,
            FavoritesAction::Remove { slug } => {
                commands::favorites::remove(&mut storefront, &slug)?;
            }
            FavoritesAction::Toggle { slug } => {
                commands::favorites::toggle(&mut storefront, &slug)?;
            }
            FavoritesAction::Clear => commands::favorites::clear(&mut storefront),
        },
    }
    Ok(())
}
