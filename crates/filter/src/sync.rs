//! Filter <-> URL synchronisation for the product listing
//!
//! Every change to the selected category, search text or sort order ends
//! in one navigation request carrying the consolidated query. Category and
//! sort navigate immediately; search text waits for the debounce window.
//! Requests are emitted on a channel and stamped with a token so the page
//! can ignore listings that arrive after a newer navigation.

use crate::debounce::Debouncer;
use crate::query::{FilterState, SortOrder};
use crate::sequence::{RequestSequencer, RequestToken};
use canopy_core::Selection;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How the page was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Full reload of the document
    Reload,
    /// Client-side visit
    Navigate,
    /// History traversal
    BackForward,
}

/// Listing request for a consolidated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Encoded query, empty when no filter applies
    pub query: String,
    pub token: RequestToken,
}

#[derive(Debug, Default)]
struct Shared {
    state: FilterState,
    /// Query of the last emitted (or adopted) navigation
    last_query: String,
}

/// Keeps filter state and the page URL in step
#[derive(Debug, Clone)]
pub struct FilterSync {
    shared: Arc<Mutex<Shared>>,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    navigations: mpsc::UnboundedSender<NavigationRequest>,
}

impl FilterSync {
    /// Create a sync with the given search debounce window
    ///
    /// The receiver yields every navigation the page should perform.
    pub fn new(search_debounce: Duration) -> (Self, mpsc::UnboundedReceiver<NavigationRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            debouncer: Debouncer::new(search_debounce),
            sequencer: RequestSequencer::new(),
            navigations: tx,
        };
        (sync, rx)
    }

    /// Initialise from the URL the page was loaded with
    ///
    /// A full reload resets the filters to their defaults and, if the URL
    /// still carried filters, navigates to the clean listing. Other loads
    /// adopt the URL as is.
    pub fn on_page_load(&self, kind: NavigationKind, query: &str) -> FilterState {
        let from_url = FilterState::from_query(query);
        self.debouncer.cancel();

        if kind == NavigationKind::Reload {
            info!("Page reloaded, resetting filters");
            let had_filters = !from_url.is_default();
            {
                let mut shared = self.shared.lock();
                shared.state = FilterState::default();
                shared.last_query = from_url.to_query();
            }
            if had_filters {
                self.navigate();
            }
        } else {
            let mut shared = self.shared.lock();
            shared.last_query = from_url.to_query();
            shared.state = from_url;
        }

        self.state()
    }

    /// Current filter state
    pub fn state(&self) -> FilterState {
        self.shared.lock().state.clone()
    }

    /// Current category selection
    pub fn selection(&self) -> Selection {
        Selection::from_slug(self.shared.lock().state.category.as_deref())
    }

    /// Select a category by slug, `None` clears the filter
    pub fn select_category(&self, slug: Option<&str>) {
        self.shared.lock().state.category = slug.filter(|s| !s.is_empty()).map(str::to_string);
        self.navigate();
    }

    pub fn set_sort(&self, sort: Option<SortOrder>) {
        self.shared.lock().state.sort = sort;
        self.navigate();
    }

    /// Record search text; navigates once typing pauses
    ///
    /// Must be called inside a tokio runtime.
    pub fn set_search(&self, text: &str) {
        self.shared.lock().state.search = text.to_string();

        let ticket = self.debouncer.schedule();
        let sync = self.clone();
        tokio::spawn(async move {
            if ticket.settled().await {
                sync.emit();
            }
        });
    }

    /// Clear every filter
    pub fn reset(&self) {
        self.shared.lock().state = FilterState::default();
        self.navigate();
    }

    /// Whether a listing answered for `token` should still be shown
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.sequencer.is_current(token)
    }

    /// Navigate now, folding in any search text still waiting on the debounce
    fn navigate(&self) {
        self.debouncer.cancel();
        self.emit();
    }

    fn emit(&self) {
        let query = {
            let mut shared = self.shared.lock();
            let query = shared.state.to_query();
            if query == shared.last_query {
                debug!("Filter query unchanged, skipping navigation");
                return;
            }
            shared.last_query = query.clone();
            query
        };

        let token = self.sequencer.next();
        debug!("Navigating with query '{}' (request {})", query, token.get());
        // Receiver gone means the page is being torn down
        let _ = self.navigations.send(NavigationRequest { query, token });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync() -> (FilterSync, mpsc::UnboundedReceiver<NavigationRequest>) {
        FilterSync::new(Duration::from_millis(400))
    }

    #[tokio::test]
    async fn test_category_and_sort_navigate_immediately() {
        let (sync, mut rx) = sync();

        sync.select_category(Some("phones"));
        sync.set_sort(Some(SortOrder::Newest));

        assert_eq!(rx.recv().await.unwrap().query, "category=phones");
        assert_eq!(rx.recv().await.unwrap().query, "category=phones&sort=newest");
    }

    #[tokio::test]
    async fn test_unchanged_state_does_not_navigate() {
        let (sync, mut rx) = sync();

        sync.select_category(Some("phones"));
        sync.select_category(Some("phones"));
        sync.select_category(None);

        assert_eq!(rx.recv().await.unwrap().query, "category=phones");
        assert_eq!(rx.recv().await.unwrap().query, "");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_keystrokes_collapse() {
        let (sync, mut rx) = sync();

        for text in ["u", "us", "usb"] {
            sync.set_search(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let request = rx.recv().await.unwrap();
        assert_eq!(request.query, "search=usb");
        assert!(sync.is_current(request.token));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_navigation_folds_pending_search() {
        let (sync, mut rx) = sync();

        sync.set_search("cable");
        sync.select_category(Some("phones"));

        assert_eq!(rx.recv().await.unwrap().query, "category=phones&search=cable");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_token_is_not_current() {
        let (sync, mut rx) = sync();

        sync.select_category(Some("phones"));
        sync.select_category(Some("books"));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(!sync.is_current(first.token));
        assert!(sync.is_current(second.token));
    }

    #[tokio::test]
    async fn test_reload_resets_filters() {
        let (sync, mut rx) = sync();

        let state = sync.on_page_load(NavigationKind::Reload, "?category=phones&sort=name");

        assert_eq!(state, FilterState::default());
        assert_eq!(rx.recv().await.unwrap().query, "");
        assert_eq!(sync.selection().slug(), None);
    }

    #[tokio::test]
    async fn test_client_navigation_adopts_url() {
        let (sync, mut rx) = sync();

        let state = sync.on_page_load(NavigationKind::BackForward, "category=books&search=tolkien");

        assert_eq!(state.category.as_deref(), Some("books"));
        assert_eq!(state.search, "tolkien");
        assert_eq!(sync.selection().slug(), Some("books"));
        assert!(rx.try_recv().is_err());

        sync.reset();
        assert_eq!(rx.recv().await.unwrap().query, "");
    }

    #[tokio::test]
    async fn test_clean_reload_does_not_navigate() {
        let (sync, mut rx) = sync();
        sync.on_page_load(NavigationKind::Reload, "");
        assert!(rx.try_recv().is_err());
    }
}
