//! Paginated, debounced, filterable collection query.
//!
//! [`PagedFilterQuery`] owns a [`FilterState`], debounces its search term,
//! derives [`QueryParams`] and keeps one page of results fetched through a
//! [`PageFetcher`]. It is driven from a single task: mutators are plain
//! `&mut self` calls, and [`PagedFilterQuery::next_event`] waits for the next
//! timer or fetch completion and applies it.
//!
//! Every request carries a generation number taken from a monotonically
//! increasing counter. A completion is applied only when its generation is the
//! latest one issued; anything older is dropped on arrival, so results never
//! go backwards when responses come back out of order.
//!
//! Dropping the query aborts in-flight requests and the debounce countdown.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{Id, JoinError, JoinSet};

use crate::config::QueryConfig;
use crate::debounce::{DebounceTimer, SearchDebounce};
use crate::error::{FetchError, QueryError};
use crate::fetch::{Page, PageFetcher};
use crate::filters::{FilterState, QueryParams};
use crate::search::Searchable;

/// Something [`PagedFilterQuery::next_event`] applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryEvent {
    /// The search term went quiet and became the debounced term.
    SearchSettled(String),
    /// The latest request succeeded and replaced the result.
    Loaded { generation: u64 },
    /// The latest request failed; the previous items are kept.
    Failed { generation: u64 },
    /// A response to an outdated request arrived and was ignored.
    StaleDiscarded { generation: u64 },
}

/// Last applied page plus request status.
#[derive(Clone, Debug)]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_search: bool,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    /// At least one page has been applied since creation or the last reset.
    pub loaded: bool,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            has_search: false,
            is_loading: false,
            error: None,
            loaded: false,
        }
    }
}

impl<T> QueryResult<T> {
    fn apply(&mut self, page: Page<T>) {
        self.items = page.items;
        self.total_count = page.total_count;
        self.total_pages = page.total_pages;
        self.has_search = page.has_search;
        self.error = None;
        self.loaded = true;
    }
}

/// Read-only view handed to the rendering layer.
#[derive(Debug)]
pub struct QuerySnapshot<'a, T> {
    pub items: &'a [T],
    pub is_loading: bool,
    pub error: Option<&'a FetchError>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub filters: &'a FilterState,
    pub is_searching: bool,
    pub has_search: bool,
    pub search_term: &'a str,
}

impl<T> QuerySnapshot<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

struct Completion<T> {
    generation: u64,
    params: QueryParams,
    outcome: Result<Page<T>, FetchError>,
}

pub struct PagedFilterQuery<F: PageFetcher> {
    fetcher: Arc<F>,
    config: QueryConfig,
    filters: FilterState,
    search: DebounceTimer<String>,
    /// Memoized; replaced only when a constituent changes.
    params: QueryParams,
    /// Generation of the most recently issued request.
    generation: u64,
    in_flight: JoinSet<Completion<F::Item>>,
    /// Generation of every task still in `in_flight`.
    task_generations: HashMap<Id, u64>,
    result: QueryResult<F::Item>,
}

impl<F: PageFetcher> PagedFilterQuery<F> {
    /// Creates the query with default filters and issues the first request.
    /// Must be called from within a Tokio runtime.
    pub fn new(fetcher: F, config: QueryConfig) -> Self {
        Self::with_shared(Arc::new(fetcher), config)
    }

    pub fn with_shared(fetcher: Arc<F>, config: QueryConfig) -> Self {
        let filters = FilterState::from_config(&config);
        let search = DebounceTimer::new(String::new());
        let params = QueryParams::derive(&filters, search.value());
        let mut query = Self {
            fetcher,
            config,
            filters,
            search,
            params,
            generation: 0,
            in_flight: JoinSet::new(),
            task_generations: HashMap::new(),
            result: QueryResult::default(),
        };
        query.issue();
        query
    }

    pub fn set_language(&mut self, language: &str) {
        self.filters.set_language(language);
        self.refresh();
    }

    /// Rejects a zero limit with [`QueryError::Validation`].
    pub fn set_limit(&mut self, limit: u32) -> Result<(), QueryError> {
        self.filters.set_limit(limit)?;
        self.refresh();
        Ok(())
    }

    /// Stores `term` verbatim and restarts the debounce countdown. The request
    /// for the new term goes out once the term has been quiet for the
    /// configured interval.
    pub fn set_search_term(&mut self, term: &str) {
        self.filters.set_search_term(term);
        self.search.observe(term.to_string(), self.config.debounce);
        self.refresh();
    }

    /// Moves to `page`. Page 0 is rejected, and so is anything past the last
    /// page once a response has told us how many there are.
    pub fn set_page(&mut self, page: u32) -> Result<(), QueryError> {
        if self.result.loaded {
            let last = self.result.total_pages.max(1);
            if page > last {
                return Err(QueryError::Validation(format!(
                    "page {} is out of range 1..={}",
                    page, last
                )));
            }
        }
        self.filters.set_page(page)?;
        self.refresh();
        Ok(())
    }

    /// Restores the configured defaults, clears the result (including any
    /// error) and requests the first page again. A pending search countdown
    /// is dropped.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::from_config(&self.config);
        self.search.reset(String::new());
        self.result = QueryResult::default();
        self.params = QueryParams::derive(&self.filters, self.search.value());
        self.issue();
    }

    /// Requests the current parameters again, superseding anything in flight.
    /// The fetcher is told to drop whatever it cached for them first.
    pub fn refetch(&mut self) {
        self.fetcher.invalidate(&self.params);
        self.issue();
    }

    /// Local search over already-fetched items; see [`crate::search_categories`].
    /// Not applied to the query's own results.
    pub fn search_categories<'a>(&self, items: &'a [F::Item], term: &str) -> Vec<&'a F::Item>
    where
        F::Item: Searchable,
    {
        <F::Item as Searchable>::text_filter().apply(items, term)
    }

    /// Waits for the next debounce expiry or request completion and applies
    /// it. Returns `None` once nothing is pending.
    pub async fn next_event(&mut self) -> Option<QueryEvent> {
        loop {
            if !self.search.is_pending() && self.in_flight.is_empty() {
                return None;
            }
            tokio::select! {
                settled = self.search.elapsed() => {
                    if let Some(term) = settled {
                        self.refresh();
                        return Some(QueryEvent::SearchSettled(term));
                    }
                }
                Some(joined) = self.in_flight.join_next_with_id() => {
                    return Some(self.complete(joined));
                }
            }
        }
    }

    /// Applies events until idle and returns the final snapshot.
    pub async fn settle(&mut self) -> QuerySnapshot<'_, F::Item> {
        while self.next_event().await.is_some() {}
        self.snapshot()
    }

    pub fn snapshot(&self) -> QuerySnapshot<'_, F::Item> {
        QuerySnapshot {
            items: &self.result.items,
            is_loading: self.result.is_loading,
            error: self.result.error.as_ref(),
            total_count: self.result.total_count,
            total_pages: self.result.total_pages,
            current_page: self.filters.page,
            filters: &self.filters,
            is_searching: self.is_searching(),
            has_search: self.result.has_search,
            search_term: &self.filters.search_term,
        }
    }

    pub fn items(&self) -> &[F::Item] {
        &self.result.items
    }

    pub fn result(&self) -> &QueryResult<F::Item> {
        &self.result
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Parameters of the request the result is supposed to reflect.
    pub fn query_params(&self) -> &QueryParams {
        &self.params
    }

    pub fn is_loading(&self) -> bool {
        self.result.is_loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.error.as_ref()
    }

    /// The typed term has not reached the backend yet.
    pub fn is_searching(&self) -> bool {
        self.filters.search_term != *self.search.value()
    }

    /// Mirrors the last successful response, not the local term.
    pub fn has_search(&self) -> bool {
        self.result.has_search
    }

    pub fn search_state(&self) -> SearchDebounce {
        SearchDebounce::from_timer(&self.search)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Re-derives the parameters and issues a request if they changed.
    fn refresh(&mut self) {
        let next = QueryParams::derive(&self.filters, self.search.value());
        if next == self.params {
            return;
        }
        self.params = next;
        self.issue();
    }

    fn issue(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let params = self.params.clone();
        let fetcher = Arc::clone(&self.fetcher);
        tracing::debug!(generation, ?params, "issuing page request");
        self.result.is_loading = true;
        let handle = self.in_flight.spawn(async move {
            let outcome = fetcher.fetch_page(&params).await;
            Completion {
                generation,
                params,
                outcome,
            }
        });
        self.task_generations.insert(handle.id(), generation);
    }

    fn complete(&mut self, joined: Result<(Id, Completion<F::Item>), JoinError>) -> QueryEvent {
        let completion = match joined {
            Ok((id, completion)) => {
                self.task_generations.remove(&id);
                completion
            }
            Err(e) => return self.task_died(e),
        };

        let generation = completion.generation;
        if generation != self.generation || completion.params != self.params {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale page response"
            );
            return QueryEvent::StaleDiscarded { generation };
        }

        self.result.is_loading = false;
        match completion.outcome {
            Ok(page) => {
                self.result.apply(page);
                QueryEvent::Loaded { generation }
            }
            Err(e) => {
                tracing::warn!(generation, "page request failed: {}", e);
                self.result.error = Some(e);
                QueryEvent::Failed { generation }
            }
        }
    }

    /// A request task panicked or was cancelled; its generation gets no page.
    fn task_died(&mut self, e: JoinError) -> QueryEvent {
        let generation = self.task_generations.remove(&e.id()).unwrap_or_default();
        if generation != self.generation {
            tracing::debug!(generation, "stale page request task ended: {}", e);
            return QueryEvent::StaleDiscarded { generation };
        }
        tracing::error!(generation, "page request task failed: {}", e);
        self.result.is_loading = false;
        self.result.error = Some(FetchError::Network(format!("request task failed: {}", e)));
        QueryEvent::Failed { generation }
    }
}
