use std::sync::Arc;

use crate::api::{CatalogApi, MediaItem, MediaKey, MediaKind, Page};
use crate::error::ApiError;
use crate::paging::{LoadOutcome, LoadTicket, PagedList};

/// Where a search session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Empty query, nothing shown
    Idle,
    /// Showing title suggestions for the current query
    Suggesting,
    /// Showing paged results of a submitted query
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Suggestions { generation: u64 },
    Results(LoadTicket),
}

/// A catalog search admitted by a [`SearchController`].
///
/// The fetch runs without borrowing the controller, so edits, scope changes
/// and resets can land while it is pending. Its result goes back through
/// [`SearchController::apply`], which drops it if it has been superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    purpose: Purpose,
    scope: MediaKind,
    query: String,
}

impl SearchRequest {
    pub fn is_suggestions(&self) -> bool {
        matches!(self.purpose, Purpose::Suggestions { .. })
    }

    pub fn page(&self) -> u32 {
        match self.purpose {
            Purpose::Suggestions { .. } => 1,
            Purpose::Results(ticket) => ticket.page,
        }
    }

    pub async fn fetch(&self, api: &dyn CatalogApi) -> Result<Page<MediaItem>, ApiError> {
        api.search(self.scope, &self.query, self.page()).await
    }
}

/// Search session over one scope at a time.
///
/// Query edits arrive already debounced through [`on_query_settled`]. Results
/// from a fetch issued for a query or scope that has since been replaced are
/// discarded.
///
/// Every operation comes in two shapes: an async method that fetches and
/// applies in one go, and a synchronous one returning a [`SearchRequest`]
/// for callers that run the fetch themselves.
///
/// [`on_query_settled`]: SearchController::on_query_settled
pub struct SearchController {
    api: Arc<dyn CatalogApi>,
    results: PagedList<MediaItem>,
    suggestions: Vec<String>,
    query: String,
    scope: MediaKind,
    state: SearchState,
    current_error: Option<ApiError>,
}

impl SearchController {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            results: PagedList::new(),
            suggestions: Vec::new(),
            query: String::new(),
            scope: MediaKind::Movie,
            state: SearchState::Idle,
            current_error: None,
        }
    }

    pub fn api(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.api)
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> MediaKind {
        self.scope
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn results(&self) -> &PagedList<MediaItem> {
        &self.results
    }

    pub fn current_error(&self) -> Option<&ApiError> {
        self.current_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ApiError> {
        self.current_error.take()
    }

    /// Record the raw text of the search field. Evaluation happens later in
    /// [`on_query_settled`](Self::on_query_settled).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Evaluate a debounced query.
    ///
    /// Empty clears everything; otherwise suggestions load while no results
    /// are shown. A settled value that no longer matches the field is ignored.
    pub async fn on_query_settled(&mut self, query: &str) -> Result<(), ApiError> {
        match self.settle(query) {
            Some(request) => self.run(request).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Synchronous half of [`on_query_settled`](Self::on_query_settled)
    pub fn settle(&mut self, query: &str) -> Option<SearchRequest> {
        if query != self.query {
            tracing::debug!("Ignoring settled query '{}', field is now '{}'", query, self.query);
            return None;
        }

        if self.query.trim().is_empty() {
            self.reset_status();
            return None;
        }

        if !self.results.is_empty() {
            return None;
        }

        Some(self.suggestions_request())
    }

    /// Switch between movie and series search
    pub async fn set_scope(&mut self, scope: MediaKind) -> Result<(), ApiError> {
        match self.change_scope(scope) {
            Some(request) => self.run(request).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Synchronous half of [`set_scope`](Self::set_scope)
    pub fn change_scope(&mut self, scope: MediaKind) -> Option<SearchRequest> {
        if scope == self.scope {
            return None;
        }
        self.scope = scope;

        if self.query.trim().is_empty() {
            self.reset_status();
            return None;
        }

        Some(self.suggestions_request())
    }

    /// Run a full search for the current query from page 1
    pub async fn submit(&mut self) -> Result<Option<LoadOutcome>, ApiError> {
        match self.begin_submit() {
            Some(request) => self.run(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Synchronous half of [`submit`](Self::submit)
    pub fn begin_submit(&mut self) -> Option<SearchRequest> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.reset_status();
        self.state = SearchState::Searching;
        tracing::info!("Searching {} for '{}'", self.scope.label(), query);

        let ticket = self.results.begin_first_load()?;
        Some(SearchRequest {
            purpose: Purpose::Results(ticket),
            scope: self.scope,
            query,
        })
    }

    /// Infinite-scroll trigger for the result list
    pub async fn load_more(&mut self, tail: MediaKey) -> Result<Option<LoadOutcome>, ApiError> {
        match self.begin_load_more(tail) {
            Some(request) => self.run(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Synchronous half of [`load_more`](Self::load_more)
    pub fn begin_load_more(&mut self, tail: MediaKey) -> Option<SearchRequest> {
        if self.state != SearchState::Searching {
            return None;
        }

        let ticket = self.results.begin_load(tail)?;
        Some(SearchRequest {
            purpose: Purpose::Results(ticket),
            scope: self.scope,
            query: self.query.trim().to_string(),
        })
    }

    /// Apply the result of a request issued by this controller.
    ///
    /// Suggestions count as appended titles. A request overtaken by a reset or
    /// a scope change yields [`LoadOutcome::Stale`] and changes nothing.
    pub fn apply(
        &mut self,
        request: SearchRequest,
        result: Result<Page<MediaItem>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        match request.purpose {
            Purpose::Results(ticket) => {
                let outcome = self.results.finish_load(ticket, result);
                self.record(outcome)
            }
            Purpose::Suggestions { generation } => {
                if self.results.generation() != generation || self.scope != request.scope {
                    tracing::debug!("Dropping suggestions for superseded query '{}'", request.query);
                    return Ok(LoadOutcome::Stale);
                }

                let page = self.record(result)?;
                let before = self.suggestions.len();
                for item in page.items {
                    if !self.suggestions.iter().any(|s| s == item.title()) {
                        self.suggestions.push(item.title().to_string());
                    }
                }
                self.state = SearchState::Suggesting;
                tracing::debug!("{} suggestions for '{}'", self.suggestions.len(), request.query);
                Ok(LoadOutcome::Appended(self.suggestions.len() - before))
            }
        }
    }

    async fn run(&mut self, request: SearchRequest) -> Result<LoadOutcome, ApiError> {
        let result = request.fetch(self.api.as_ref()).await;
        self.apply(request, result)
    }

    /// Clear the lists and issue a first-page title fetch for the current
    /// query and scope
    fn suggestions_request(&mut self) -> SearchRequest {
        self.reset_status();
        SearchRequest {
            purpose: Purpose::Suggestions {
                generation: self.results.generation(),
            },
            scope: self.scope,
            query: self.query.trim().to_string(),
        }
    }

    fn reset_status(&mut self) {
        self.results.reset();
        self.suggestions.clear();
        self.state = SearchState::Idle;
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            tracing::warn!("Search request failed: {}", e);
            self.current_error = Some(e.clone());
        }
        result
    }
}
