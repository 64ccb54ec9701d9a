//! Keyword search command.
//!
//! The query goes through the same debounced session an interactive search
//! box uses; the command waits for it to settle and prints the preview.

use greenshop_storefront::search::{PREVIEW_LIMIT, SearchState};
use greenshop_storefront::state::Storefront;

use super::product_row;

/// Run a search and print up to [`PREVIEW_LIMIT`] results.
pub async fn run(storefront: &Storefront, query: &str) {
    let mut session = storefront.search_session();
    session.submit(query);

    let outcome = match session.settled().await {
        SearchState::Ready(outcome) => outcome,
        SearchState::Idle | SearchState::Pending { .. } => {
            println!("Enter a search term.");
            return;
        }
    };

    if outcome.is_empty() {
        println!("No products found for \"{}\".", outcome.query);
        return;
    }

    for product in outcome.preview() {
        println!("  {}  [{}]", product_row(product), product.slug);
    }
    let total = outcome.total();
    if total > PREVIEW_LIMIT {
        println!("Showing {PREVIEW_LIMIT} of {total} results for \"{}\".", outcome.query);
    } else {
        println!("{total} result(s) for \"{}\".", outcome.query);
    }
}
