//! Catalog engine operations
//!
//! Every state-changing input bumps a revision that the fetch driver
//! watches; the driver cancels the in-flight fetch and starts a new one
//! per bump, so a superseded response can never commit.

use std::sync::{Arc, RwLock, Weak};

use shared::models::{NewProduct, Product, SortField, SortOrder};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::{CatalogApi, ListQuery};
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::storage::{PersistedUiState, UiStatePersist};

use super::state::{CatalogState, QuerySnapshot};

/// Owns the catalog query state and the fetch cycle. Constructed once
/// at process start; the catalog gateway is injected.
pub struct CatalogEngine {
    gateway: Arc<dyn CatalogApi>,
    persist: UiStatePersist,
    state: RwLock<CatalogState>,
    revision: watch::Sender<u64>,
    debouncer: Debouncer,
    // Handle to self for the debounced search task
    weak: Weak<CatalogEngine>,
}

impl CatalogEngine {
    /// Create the engine, restoring persisted page/search. All other
    /// fields start at their defaults.
    pub fn new(
        gateway: Arc<dyn CatalogApi>,
        persist: UiStatePersist,
        config: &ClientConfig,
    ) -> Arc<Self> {
        let restored = persist.load();
        let mut state = CatalogState::new(config.page_size);
        state.page = restored.page.max(1);
        state.search_input = restored.search_query.clone();
        state.search_query = restored.search_query;

        let (revision, _) = watch::channel(0);

        Arc::new_cyclic(|weak| Self {
            gateway,
            persist,
            state: RwLock::new(state),
            revision,
            debouncer: Debouncer::new(config.search_debounce),
            weak: weak.clone(),
        })
    }

    // ========================================================================
    // Query Inputs
    // ========================================================================

    /// Set the current page. Bounds are a view concern: any positive
    /// page is accepted and an out-of-range page simply fetches empty.
    pub fn set_page(&self, page: u32) {
        let changed = {
            let mut state = self.state.write().unwrap();
            let page = page.max(1);
            if state.page == page {
                false
            } else {
                state.page = page;
                true
            }
        };
        if changed {
            self.persist_ui();
            self.bump();
        }
    }

    /// Toggle sorting: same field while ascending flips to descending,
    /// every other case starts ascending. Always resets to page 1 since
    /// a sort change invalidates the user's positional context.
    pub fn set_sort(&self, field: SortField) {
        {
            let mut state = self.state.write().unwrap();
            state.order = if state.sort_by == Some(field) && state.order == SortOrder::Asc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            state.sort_by = Some(field);
            state.page = 1;
        }
        self.persist_ui();
        self.bump();
    }

    /// Raw keystroke input: updates the input-only value immediately
    /// and schedules the debounced [`set_search_query`] behind the
    /// quiet interval. Each keystroke cancels the previous schedule.
    ///
    /// [`set_search_query`]: CatalogEngine::set_search_query
    pub fn set_search_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.write().unwrap().search_input = text.clone();

        let engine = self.weak.clone();
        self.debouncer.schedule(move || {
            if let Some(engine) = engine.upgrade() {
                engine.set_search_query(text);
            }
        });
    }

    /// Commit a search text. A repeated identical value is a no-op so a
    /// debounce firing with an unchanged value cannot reset the page.
    pub fn set_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.search_query == text {
                false
            } else {
                state.search_input = text.clone();
                state.search_query = text;
                state.page = 1;
                true
            }
        };
        if changed {
            self.persist_ui();
            self.bump();
        }
    }

    /// Re-run the unfiltered first page, even when nothing changed.
    pub fn refresh(&self) {
        self.set_search_query("");
        self.set_page(1);
        self.bump();
    }

    /// Reset the persisted slice (page and search). Wired to the
    /// session controller's logout hook.
    pub fn reset_persisted(&self) {
        self.debouncer.cancel();
        {
            let mut state = self.state.write().unwrap();
            state.page = 1;
            state.search_input.clear();
            state.search_query.clear();
        }
        self.persist_ui();
    }

    // ========================================================================
    // Fetch Cycle
    // ========================================================================

    /// The single fetch entry point, re-invoked whenever page, sort or
    /// the debounced search text changes.
    ///
    /// A non-empty (trimmed) search goes to the search endpoint, which
    /// defines its own ordering; otherwise the listing endpoint is
    /// called, with sort parameters only when a sort field is set.
    /// The result commits only if `cancel` has not fired: a superseded
    /// fetch is discarded silently, whatever its arrival order.
    pub async fn load_products(&self, cancel: &CancellationToken) {
        let query = {
            let mut state = self.state.write().unwrap();
            state.loading = true;
            state.error = None;
            QuerySnapshot::of(&state)
        };

        let search = query.search_query.trim();
        let result = if !search.is_empty() {
            self.gateway
                .search(search, query.limit, query.skip(), cancel)
                .await
        } else {
            let list_query = ListQuery {
                limit: query.limit,
                skip: query.skip(),
                sort_by: query.sort_by,
                order: query.order,
            };
            self.gateway.fetch_page(&list_query, cancel).await
        };

        // Checked immediately before committing, not just at call
        // start: a token fired mid-flight means a newer request owns
        // the state now.
        if cancel.is_cancelled() {
            tracing::debug!("Fetch superseded, discarding result");
            return;
        }

        let mut state = self.state.write().unwrap();
        match result {
            Ok(page) => {
                state.items = page.products;
                state.total = page.total;
                state.loading = false;
                state.error = None;
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::debug!("Fetch failed: {}", e);
                state.loading = false;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Dismiss the current fetch error without retrying.
    pub fn dismiss_error(&self) {
        self.state.write().unwrap().error = None;
    }

    // ========================================================================
    // Local Products
    // ========================================================================

    /// Create a product locally, with no remote round-trip. Ids are
    /// negative and strictly decreasing, so they can never collide with
    /// server-assigned ids.
    pub fn add_local_product(&self, form: NewProduct) -> Product {
        let mut state = self.state.write().unwrap();
        let id = state.last_local_id - 1;
        state.last_local_id = id;

        let product = Product {
            id,
            title: form.title,
            description: None,
            category: String::new(),
            price: form.price,
            discount_percentage: None,
            rating: 0.0,
            stock: None,
            brand: form.brand,
            sku: Some(form.sku),
            thumbnail: None,
            images: None,
        };
        state.local_products.insert(0, product.clone());
        product
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Toggle one row's selection.
    pub fn toggle_select(&self, id: i64) {
        let mut state = self.state.write().unwrap();
        if !state.selected_ids.remove(&id) {
            state.selected_ids.insert(id);
        }
    }

    /// Select-all over the visible page: if every id is already
    /// selected, deselect them all; otherwise select them all. Never a
    /// partial toggle.
    pub fn toggle_select_all(&self, current_page_ids: &[i64]) {
        let mut state = self.state.write().unwrap();
        let all_selected = !current_page_ids.is_empty()
            && current_page_ids
                .iter()
                .all(|id| state.selected_ids.contains(id));

        if all_selected {
            for id in current_page_ids {
                state.selected_ids.remove(id);
            }
        } else {
            for id in current_page_ids {
                state.selected_ids.insert(*id);
            }
        }
    }

    /// True when every visible id is selected. Stale ids outside
    /// `current_page_ids` do not count.
    pub fn all_selected(&self, current_page_ids: &[i64]) -> bool {
        let state = self.state.read().unwrap();
        !current_page_ids.is_empty()
            && current_page_ids
                .iter()
                .all(|id| state.selected_ids.contains(id))
    }

    pub fn clear_selection(&self) {
        self.state.write().unwrap().selected_ids.clear();
    }

    // ========================================================================
    // Derived Display
    // ========================================================================

    /// The rows to display. Local products are prepended only on the
    /// unfiltered first page; they have no position in the server's
    /// sort/filter order anywhere else.
    pub fn display_items(&self) -> Vec<Product> {
        let state = self.state.read().unwrap();
        if state.page == 1 && state.search_query.is_empty() {
            state
                .local_products
                .iter()
                .chain(state.items.iter())
                .cloned()
                .collect()
        } else {
            state.items.clone()
        }
    }

    /// The total to display: remote total under a search, remote total
    /// plus local count otherwise.
    pub fn display_total(&self) -> u64 {
        let state = self.state.read().unwrap();
        if state.search_query.is_empty() {
            state.total + state.local_products.len() as u64
        } else {
            state.total
        }
    }

    // ========================================================================
    // Read Accessors
    // ========================================================================

    /// A full copy of the current state.
    pub fn snapshot(&self) -> CatalogState {
        self.state.read().unwrap().clone()
    }

    pub fn page(&self) -> u32 {
        self.state.read().unwrap().page
    }

    pub fn loading(&self) -> bool {
        self.state.read().unwrap().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().unwrap().error.clone()
    }

    pub fn search_query(&self) -> String {
        self.state.read().unwrap().search_query.clone()
    }

    /// Watch the query revision; the fetch driver re-fetches on every
    /// change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn persist_ui(&self) {
        let persisted = {
            let state = self.state.read().unwrap();
            PersistedUiState {
                page: state.page,
                search_query: state.search_query.clone(),
            }
        };
        self.persist.save(&persisted);
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ClientResult};
    use crate::storage::MemoryArea;
    use async_trait::async_trait;
    use shared::client::ProductPage;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records calls and serves canned pages, optionally after a delay.
    struct FakeCatalog {
        delay: Duration,
        fail: bool,
        /// Keep running through a cancelled token, like a network
        /// response already past the point of abort.
        ignore_cancel: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn new() -> Self {
            Self {
                delay: Duration::ZERO,
                fail: false,
                ignore_cancel: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn remote(id: i64, title: &str) -> Product {
        Product {
            id,
            title: title.into(),
            description: None,
            category: "beauty".into(),
            price: 9.99,
            discount_percentage: None,
            rating: 4.5,
            stock: None,
            brand: "Acme".into(),
            sku: None,
            thumbnail: None,
            images: None,
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn fetch_page(
            &self,
            query: &ListQuery,
            cancel: &CancellationToken,
        ) -> ClientResult<ProductPage> {
            self.calls.lock().unwrap().push(format!(
                "list limit={} skip={} sort={:?}",
                query.limit,
                query.skip,
                query.sort_by.map(|f| f.as_str())
            ));
            if !self.delay.is_zero() {
                if self.ignore_cancel {
                    tokio::time::sleep(self.delay).await;
                } else {
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                        _ = tokio::time::sleep(self.delay) => {}
                    }
                }
            }
            if self.fail {
                return Err(ClientError::Rejected("Failed to load products".into()));
            }
            Ok(ProductPage {
                products: vec![remote(1, "Soap"), remote(2, "Brush")],
                total: 42,
                skip: query.skip,
                limit: u64::from(query.limit),
            })
        }

        async fn search(
            &self,
            q: &str,
            limit: u32,
            skip: u64,
            _cancel: &CancellationToken,
        ) -> ClientResult<ProductPage> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("search q={} limit={} skip={}", q, limit, skip));
            Ok(ProductPage {
                products: vec![remote(9, "Match")],
                total: 1,
                skip,
                limit: u64::from(limit),
            })
        }
    }

    fn engine_with(gateway: Arc<FakeCatalog>) -> Arc<CatalogEngine> {
        let persist = UiStatePersist::new(Arc::new(MemoryArea::new()));
        let config =
            ClientConfig::new("http://unused").with_search_debounce(Duration::from_millis(10));
        CatalogEngine::new(gateway, persist, &config)
    }

    fn engine() -> Arc<CatalogEngine> {
        engine_with(Arc::new(FakeCatalog::new()))
    }

    #[test]
    fn test_sort_toggle_alternates_and_resets_page() {
        let engine = engine();
        engine.set_page(4);

        engine.set_sort(SortField::Price);
        let s = engine.snapshot();
        assert_eq!((s.sort_by, s.order, s.page), (Some(SortField::Price), SortOrder::Asc, 1));

        engine.set_page(4);
        engine.set_sort(SortField::Price);
        let s = engine.snapshot();
        assert_eq!((s.order, s.page), (SortOrder::Desc, 1));

        engine.set_sort(SortField::Price);
        assert_eq!(engine.snapshot().order, SortOrder::Asc);

        // Switching fields always starts ascending
        engine.set_sort(SortField::Price);
        engine.set_sort(SortField::Brand);
        let s = engine.snapshot();
        assert_eq!((s.sort_by, s.order), (Some(SortField::Brand), SortOrder::Asc));
    }

    #[test]
    fn test_search_query_noop_on_identical_value() {
        let engine = engine();
        let mut revision = engine.subscribe();

        engine.set_search_query("phone");
        assert_eq!(engine.page(), 1);
        engine.set_page(3);
        assert!(revision.has_changed().unwrap());
        revision.mark_unchanged();

        // Identical value: no page reset, no revision bump
        engine.set_search_query("phone");
        assert_eq!(engine.page(), 3);
        assert!(!revision.has_changed().unwrap());
    }

    #[test]
    fn test_add_local_products_ids_and_order() {
        let engine = engine();

        let first = engine.add_local_product(NewProduct {
            title: "Mug".into(),
            price: 3.0,
            brand: "Local".into(),
            sku: "M-1".into(),
        });
        let second = engine.add_local_product(NewProduct {
            title: "Plate".into(),
            price: 4.0,
            brand: "Local".into(),
            sku: "P-1".into(),
        });

        assert_eq!(first.id, -1);
        assert_eq!(second.id, -2);
        assert_eq!(first.rating, 0.0);
        assert_eq!(first.category, "");

        let s = engine.snapshot();
        assert_eq!(s.last_local_id, -2);
        // Newest first
        assert_eq!(s.local_products[0].title, "Plate");
        assert_eq!(s.local_products[1].title, "Mug");
    }

    #[tokio::test]
    async fn test_display_merge_on_unfiltered_first_page() {
        let engine = engine();
        let cancel = CancellationToken::new();
        engine.load_products(&cancel).await;

        engine.add_local_product(NewProduct {
            title: "Mug".into(),
            price: 3.0,
            brand: "Local".into(),
            sku: "M-1".into(),
        });
        engine.add_local_product(NewProduct {
            title: "Plate".into(),
            price: 4.0,
            brand: "Local".into(),
            sku: "P-1".into(),
        });

        let items = engine.display_items();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, "Plate");
        assert_eq!(items[1].title, "Mug");
        assert_eq!(items[2].title, "Soap");
        assert_eq!(engine.display_total(), 44);

        // Off the first page only remote items show
        engine.set_page(2);
        assert_eq!(engine.display_items().len(), 2);

        // Under a search the remote total stands alone
        engine.set_search_query("mug");
        assert_eq!(engine.display_total(), engine.snapshot().total);
        assert_eq!(engine.display_items().len(), 2);
    }

    #[test]
    fn test_toggle_select_all_never_partial() {
        let engine = engine();
        engine.toggle_select(1);
        engine.toggle_select(2);

        engine.toggle_select_all(&[1, 2, 3]);
        let s = engine.snapshot();
        assert!(s.selected_ids.contains(&1));
        assert!(s.selected_ids.contains(&2));
        assert!(s.selected_ids.contains(&3));
        assert!(engine.all_selected(&[1, 2, 3]));

        engine.toggle_select_all(&[1, 2, 3]);
        assert!(engine.snapshot().selected_ids.is_empty());

        // Stale selections elsewhere stay untouched
        engine.toggle_select(99);
        engine.toggle_select_all(&[1, 2]);
        let s = engine.snapshot();
        assert!(s.selected_ids.contains(&99));
        assert!(engine.all_selected(&[1, 2]));
        assert!(!engine.all_selected(&[]));

        engine.clear_selection();
        assert!(engine.snapshot().selected_ids.is_empty());
    }

    #[tokio::test]
    async fn test_load_commits_items_and_total() {
        let gateway = Arc::new(FakeCatalog::new());
        let engine = engine_with(gateway.clone());

        engine.load_products(&CancellationToken::new()).await;

        let s = engine.snapshot();
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.total, 42);
        assert!(!s.loading);
        assert_eq!(s.error, None);
        assert_eq!(gateway.calls(), vec!["list limit=5 skip=0 sort=None"]);
    }

    #[tokio::test]
    async fn test_load_uses_search_endpoint_and_ignores_sort() {
        let gateway = Arc::new(FakeCatalog::new());
        let engine = engine_with(gateway.clone());

        engine.set_sort(SortField::Price);
        engine.set_page(2);
        engine.set_search_query("  mug  ");
        engine.load_products(&CancellationToken::new()).await;

        // Search text is trimmed and the page reset by the query change
        assert_eq!(gateway.calls(), vec!["search q=mug limit=5 skip=0"]);
        assert_eq!(engine.snapshot().total, 1);
    }

    #[tokio::test]
    async fn test_load_sends_sort_params_only_when_set() {
        let gateway = Arc::new(FakeCatalog::new());
        let engine = engine_with(gateway.clone());

        engine.load_products(&CancellationToken::new()).await;
        engine.set_sort(SortField::Rating);
        engine.load_products(&CancellationToken::new()).await;

        assert_eq!(
            gateway.calls(),
            vec![
                "list limit=5 skip=0 sort=None",
                "list limit=5 skip=0 sort=Some(\"rating\")"
            ]
        );
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_clears_loading() {
        let engine = engine_with(Arc::new(FakeCatalog::failing()));

        engine.load_products(&CancellationToken::new()).await;

        let s = engine.snapshot();
        assert!(!s.loading);
        assert_eq!(s.error.as_deref(), Some("Failed to load products"));

        engine.dismiss_error();
        assert_eq!(engine.error(), None);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_leaves_state_untouched() {
        let gateway = Arc::new(FakeCatalog {
            delay: Duration::from_millis(50),
            ..FakeCatalog::new()
        });
        let engine = engine_with(gateway);

        let cancel = CancellationToken::new();
        let c = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            c.cancel();
        });
        engine.load_products(&cancel).await;

        let s = engine.snapshot();
        assert!(s.items.is_empty());
        assert_eq!(s.total, 0);
        // Cancellation is not an error
        assert_eq!(s.error, None);
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer_result() {
        let slow = Arc::new(FakeCatalog {
            delay: Duration::from_millis(60),
            ignore_cancel: true,
            ..FakeCatalog::new()
        });
        let engine = engine_with(slow);

        // Fetch A (older, slow), superseded by B (newer, instant)
        let cancel_a = CancellationToken::new();
        let engine_a = engine.clone();
        let token_a = cancel_a.clone();
        let fetch_a = tokio::spawn(async move { engine_a.load_products(&token_a).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.set_search_query("mug");
        cancel_a.cancel();
        engine.load_products(&CancellationToken::new()).await;

        fetch_a.await.unwrap();

        // B's search result stands even though A resolved later
        let s = engine.snapshot();
        assert_eq!(s.total, 1);
        assert_eq!(s.items[0].title, "Match");
    }

    #[tokio::test]
    async fn test_debounced_input_commits_last_value_once() {
        let engine = engine();

        engine.set_search_input("p");
        engine.set_search_input("ph");
        engine.set_search_input("pho");
        assert_eq!(engine.snapshot().search_input, "pho");
        // Not yet committed
        assert_eq!(engine.search_query(), "");

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(engine.search_query(), "pho");
        assert_eq!(engine.page(), 1);
    }

    #[test]
    fn test_persisted_page_and_search_survive_reload() {
        let area = Arc::new(MemoryArea::new());
        let config = ClientConfig::new("http://unused");
        {
            let engine = CatalogEngine::new(
                Arc::new(FakeCatalog::new()),
                UiStatePersist::new(area.clone()),
                &config,
            );
            engine.set_search_query("soap");
            engine.set_page(3);
            engine.toggle_select(1);
        }

        // Same session area, fresh engine: only page + search restore
        let engine = CatalogEngine::new(
            Arc::new(FakeCatalog::new()),
            UiStatePersist::new(area),
            &config,
        );
        let s = engine.snapshot();
        assert_eq!(s.page, 3);
        assert_eq!(s.search_query, "soap");
        assert_eq!(s.search_input, "soap");
        assert!(s.selected_ids.is_empty());
        assert!(s.items.is_empty());
    }

    #[test]
    fn test_reset_persisted_clears_page_and_search() {
        let area = Arc::new(MemoryArea::new());
        let config = ClientConfig::new("http://unused");
        let engine = CatalogEngine::new(
            Arc::new(FakeCatalog::new()),
            UiStatePersist::new(area.clone()),
            &config,
        );
        engine.set_search_query("soap");
        engine.set_page(2);

        engine.reset_persisted();

        let s = engine.snapshot();
        assert_eq!(s.page, 1);
        assert_eq!(s.search_query, "");

        let restored = UiStatePersist::new(area).load();
        assert_eq!(restored.page, 1);
        assert_eq!(restored.search_query, "");
    }
}
