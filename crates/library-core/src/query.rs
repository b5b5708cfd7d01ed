//! Paginated agent list accessor
//!
//! Owns the accumulated page history for one set of filters and derives a
//! stable view from it: the flattened agent list, the total count, and the
//! loading/pagination flags. Derivations are pure functions of the page
//! history, so they are unit-testable without a server.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{FetchedPage, LibraryAgent, LibraryAgentResponse, LibraryClient, LibrarySort, ListQuery};

/// Page size the platform UI requests
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Search/sort filters applied to the agent list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub sort: LibrarySort,
}

impl FilterState {
    /// Build the query for page 1 under these filters.
    ///
    /// An empty search term is sent as no parameter at all, so the backend
    /// sees "unfiltered" rather than "filter by empty string".
    pub fn to_query(&self, page_size: u32) -> ListQuery {
        ListQuery {
            page: 1,
            page_size,
            search_term: if self.search_term.is_empty() {
                None
            } else {
                Some(self.search_term.clone())
            },
            sort_by: self.sort,
        }
    }
}

/// Validate a fetched page, returning its payload if usable.
///
/// Single source of truth for what counts as a valid page; both the
/// flattening and the count derivation go through here.
pub fn valid_page(page: &FetchedPage) -> Option<&LibraryAgentResponse> {
    if page.status != 200 {
        return None;
    }
    page.data.as_ref()
}

/// Decide the next page number from the most recently fetched page.
///
/// Returns `None` when the last page is missing, invalid, or already covers
/// the full result set.
pub fn next_page_param(last: Option<&FetchedPage>) -> Option<u32> {
    let pagination = valid_page(last?)?.pagination?;

    let is_more =
        u64::from(pagination.current_page) * u64::from(pagination.page_size) < pagination.total_items;

    is_more.then(|| pagination.current_page + 1)
}

/// Flatten all valid pages into one agent list, preserving fetch order and
/// each page's internal order. Invalid pages contribute nothing.
pub fn flatten_agents(pages: &[FetchedPage]) -> Vec<LibraryAgent> {
    pages
        .iter()
        .filter_map(valid_page)
        .flat_map(|resp| resp.agents.iter().cloned())
        .collect()
}

/// Total item count as reported by the first page's pagination block.
///
/// Zero when no page has been fetched or the first page is invalid,
/// regardless of later pages.
pub fn total_agent_count(pages: &[FetchedPage]) -> u64 {
    pages
        .first()
        .and_then(valid_page)
        .and_then(|resp| resp.pagination)
        .map(|p| p.total_items)
        .unwrap_or(0)
}

/// Derived, read-only snapshot of the accumulated list state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentListView {
    pub all_agents: Vec<LibraryAgent>,
    pub agent_count: u64,
    pub agent_loading: bool,
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
}

/// Accumulating accessor over the paginated list endpoint
#[derive(Debug)]
pub struct LibraryAgentList {
    client: LibraryClient,
    filter: FilterState,
    page_size: u32,
    pages: Vec<FetchedPage>,
    fetching_next: bool,
}

impl LibraryAgentList {
    pub fn new(client: LibraryClient, filter: FilterState) -> Self {
        Self {
            client,
            filter,
            page_size: DEFAULT_PAGE_SIZE,
            pages: Vec::new(),
            fetching_next: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Replace the filters. A changed filter invalidates the accumulated
    /// pages; the next fetch starts over from page 1.
    pub fn set_filter(&mut self, filter: FilterState) {
        if filter != self.filter {
            debug!(?filter, "filter changed, resetting page history");
            self.filter = filter;
            self.pages.clear();
        }
    }

    fn next_page(&self) -> Option<u32> {
        if self.pages.is_empty() {
            Some(1)
        } else {
            next_page_param(self.pages.last())
        }
    }

    /// Fetch the next page and append it to the history.
    ///
    /// Returns `Ok(false)` without issuing a request when the list is
    /// exhausted. Transport failures propagate; HTTP-level failures are
    /// recorded as invalid pages that contribute nothing to the view.
    pub async fn fetch_next_page(&mut self) -> Result<bool> {
        let Some(page) = self.next_page() else {
            return Ok(false);
        };

        let query = self.filter.to_query(self.page_size).for_page(page);

        self.fetching_next = true;
        let result = self.client.list_agents(&query).await;
        self.fetching_next = false;

        let fetched = result?;
        if valid_page(&fetched).is_none() {
            warn!(status = fetched.status, page, "fetched page is invalid");
        }
        self.pages.push(fetched);

        Ok(true)
    }

    /// Fetch pages until the list is exhausted or `max_pages` accumulate.
    pub async fn fetch_all(&mut self, max_pages: usize) -> Result<()> {
        while self.pages.len() < max_pages && self.fetch_next_page().await? {}
        Ok(())
    }

    /// Derive the current view from the page history.
    pub fn view(&self) -> AgentListView {
        AgentListView {
            all_agents: flatten_agents(&self.pages),
            agent_count: total_agent_count(&self.pages),
            agent_loading: self.pages.is_empty(),
            has_next_page: self.next_page().is_some(),
            is_fetching_next_page: self.fetching_next,
        }
    }
}
