//! Debounced search session.
//!
//! Each call to [`SearchSession::submit`] cancels the previously scheduled
//! search and schedules a new one after the debounce delay. Only a query that
//! survives the whole quiet window is actually run against the catalog.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::catalog::Catalog;

use super::{SearchOutcome, SearchState, normalize_query};

/// Quiet period after the last keystroke before a search runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A cancellable, debounced search over a shared catalog.
///
/// State changes are published on a `watch` channel; subscribers always see
/// the latest [`SearchState`]. Dropping the session cancels any pending search.
pub struct SearchSession {
    catalog: Arc<Catalog>,
    delay: Duration,
    publisher: Arc<Publisher>,
    pending: Option<JoinHandle<()>>,
}

/// Serializes state updates so a stale task can never overwrite the state of
/// a newer submission.
struct Publisher {
    generation: Mutex<u64>,
    state: watch::Sender<SearchState>,
}

impl Publisher {
    /// Start a new generation and publish `state` for it.
    fn advance(&self, state: SearchState) -> u64 {
        let mut generation = self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.state.send_replace(state);
        *generation
    }

    /// Publish `state` only if no newer generation has started.
    fn publish_if_current(&self, generation: u64, state: SearchState) -> bool {
        let current = self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return false;
        }
        self.state.send_replace(state);
        true
    }
}

impl SearchSession {
    /// Create an idle session.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            catalog,
            delay,
            publisher: Arc::new(Publisher {
                generation: Mutex::new(0),
                state,
            }),
            pending: None,
        }
    }

    /// The debounce delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.publisher.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> SearchState {
        self.publisher.state.borrow().clone()
    }

    /// Record a new query (e.g. on every keystroke).
    ///
    /// Any pending search is cancelled. An empty query moves the session to
    /// [`SearchState::Idle`] immediately; otherwise the session becomes
    /// [`SearchState::Pending`] and the search runs once the debounce delay
    /// elapses without another submission.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn submit(&mut self, query: &str) {
        self.abort_pending();

        let needle = normalize_query(query);
        if needle.is_empty() {
            self.publisher.advance(SearchState::Idle);
            return;
        }

        let generation = self.publisher.advance(SearchState::Pending {
            query: needle.clone(),
        });
        trace!(query = %needle, generation, "Search scheduled");

        let catalog = Arc::clone(&self.catalog);
        let publisher = Arc::clone(&self.publisher);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let products: Vec<_> = catalog.search(&needle).into_iter().cloned().collect();
            let results = products.len();
            let outcome = SearchOutcome {
                query: needle,
                products,
            };

            if publisher.publish_if_current(generation, SearchState::Ready(outcome)) {
                debug!(results, "Search settled");
            }
        }));
    }

    /// Cancel any pending search and clear the results.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.publisher.advance(SearchState::Idle);
    }

    /// Wait until the session is no longer pending and return that state.
    pub async fn settled(&self) -> SearchState {
        let mut receiver = self.subscribe();
        let state = receiver
            .wait_for(|state| !state.is_pending())
            .await
            .map(|state| state.clone())
            .unwrap_or_default();
        state
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("delay", &self.delay)
            .field("state", &*self.publisher.state.borrow())
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}
