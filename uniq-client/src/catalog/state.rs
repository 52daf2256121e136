//! Catalog query state

use std::collections::HashSet;

use shared::models::{Product, SortField, SortOrder};

/// The complete catalog query state. Mutated only through
/// [`CatalogEngine`](super::CatalogEngine) operations; views read it via
/// snapshots.
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// Current page of remote results; replaced wholesale per fetch.
    pub items: Vec<Product>,
    /// Total remote-matching count for the current filter/sort.
    pub total: u64,
    /// Current 1-based page.
    pub page: u32,
    /// Fixed page size.
    pub limit: u32,
    /// True while a fetch is in flight.
    pub loading: bool,
    /// Last fetch failure, dismissable independently of retry.
    pub error: Option<String>,
    /// None means the server's default order.
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
    /// Raw search input, updated on every keystroke.
    pub search_input: String,
    /// Debounced search text; the value that drives fetches.
    pub search_query: String,
    /// Selected row ids. Never pruned when the page's item set changes;
    /// ids outside the visible set are inert.
    pub selected_ids: HashSet<i64>,
    /// Locally created products, newest first. Memory only.
    pub local_products: Vec<Product>,
    /// Strictly decreasing seed for negative local ids.
    pub last_local_id: i64,
}

impl CatalogState {
    pub(crate) fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit,
            loading: false,
            error: None,
            sort_by: None,
            order: SortOrder::Asc,
            search_input: String::new(),
            search_query: String::new(),
            selected_ids: HashSet::new(),
            local_products: Vec::new(),
            last_local_id: 0,
        }
    }
}

/// The fetch-relevant inputs captured at the start of one load cycle.
#[derive(Debug, Clone)]
pub(crate) struct QuerySnapshot {
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
    pub search_query: String,
}

impl QuerySnapshot {
    pub(crate) fn of(state: &CatalogState) -> Self {
        Self {
            page: state.page,
            limit: state.limit,
            sort_by: state.sort_by,
            order: state.order,
            search_query: state.search_query.clone(),
        }
    }

    /// Pagination offset for the current page.
    pub(crate) fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}
