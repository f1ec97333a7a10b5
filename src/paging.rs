//! Incrementally loaded, deduplicated result lists.
//!
//! A [`PagedList`] backs one logical list (trending, or one search scope).
//! Pages are appended as the user scrolls: reaching the current tail item
//! requests the next page, and items already present are dropped so that a
//! page delivered twice, or results that shift between pages on the server,
//! never produce duplicates.

use std::collections::HashSet;
use std::future::Future;

use crate::api::{MediaItem, MediaKey, Page};
use crate::error::ApiError;

/// Items that can be deduplicated in a [`PagedList`]
pub trait Keyed {
    fn key(&self) -> MediaKey;
}

impl Keyed for MediaItem {
    fn key(&self) -> MediaKey {
        MediaItem::key(self)
    }
}

/// Admission to load one page, tied to the list generation it was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub page: u32,
    generation: u64,
}

/// Result of completing a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page applied; number of new items appended
    Appended(usize),
    /// List was reset while the fetch was in flight; result dropped
    Stale,
}

/// Ordered, deduplicated list fed one page at a time.
///
/// At most one load is admitted at a time. Every [`reset`](Self::reset) bumps
/// the generation so results of loads issued before it are discarded.
#[derive(Debug)]
pub struct PagedList<T> {
    items: Vec<T>,
    keys: HashSet<MediaKey>,
    current_page: u32,
    total_pages: u32,
    generation: u64,
    in_flight: bool,
}

impl<T: Keyed> PagedList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            keys: HashSet::new(),
            current_page: 1,
            total_pages: 1,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn contains(&self, key: &MediaKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_tail(&self, key: MediaKey) -> bool {
        self.items.last().map(Keyed::key) == Some(key)
    }

    /// Append the items of `page` not already present, in server order, and
    /// adopt its pagination. Returns the number of items appended.
    pub fn append_page(&mut self, page: Page<T>) -> usize {
        let before = self.items.len();
        for item in page.items {
            if self.keys.insert(item.key()) {
                self.items.push(item);
            }
        }
        self.current_page = page.page;
        self.total_pages = page.total_pages;
        self.items.len() - before
    }

    /// Clear the list and invalidate any load in flight
    pub fn reset(&mut self) {
        self.items.clear();
        self.keys.clear();
        self.current_page = 1;
        self.total_pages = 1;
        self.generation += 1;
        self.in_flight = false;
    }

    /// Admit a load of page 1
    pub fn begin_first_load(&mut self) -> Option<LoadTicket> {
        if self.in_flight {
            tracing::debug!("First page load skipped: a load is already in flight");
            return None;
        }
        self.in_flight = true;
        Some(LoadTicket {
            page: 1,
            generation: self.generation,
        })
    }

    /// Admit a load of the next page when `tail` is the last item, more pages
    /// exist and nothing is in flight. Stale or duplicate triggers get `None`.
    pub fn begin_load(&mut self, tail: MediaKey) -> Option<LoadTicket> {
        if self.in_flight || !self.has_more() || !self.is_tail(tail) {
            return None;
        }
        self.in_flight = true;
        Some(LoadTicket {
            page: self.current_page + 1,
            generation: self.generation,
        })
    }

    /// Complete an admitted load. A failure leaves items and pagination as
    /// they were, so the same trigger can retry.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Page<T>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        if ticket.generation != self.generation {
            tracing::debug!("Dropping page {} from a superseded list", ticket.page);
            return Ok(LoadOutcome::Stale);
        }
        self.in_flight = false;

        let page = result?;
        let appended = self.append_page(page);
        tracing::debug!(
            "Page {}/{} appended {} items ({} total)",
            self.current_page,
            self.total_pages,
            appended,
            self.items.len()
        );
        Ok(LoadOutcome::Appended(appended))
    }

    /// Fetch and append page 1
    pub async fn load_first_page<F, Fut>(&mut self, fetch: F) -> Result<Option<LoadOutcome>, ApiError>
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
    {
        let Some(ticket) = self.begin_first_load() else {
            return Ok(None);
        };
        let result = fetch(ticket.page).await;
        self.finish_load(ticket, result).map(Some)
    }

    /// Infinite-scroll trigger: fetch the next page only if `tail` is the
    /// current last item and more pages exist. `Ok(None)` when not triggered.
    pub async fn maybe_load_more<F, Fut>(
        &mut self,
        tail: MediaKey,
        fetch: F,
    ) -> Result<Option<LoadOutcome>, ApiError>
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
    {
        let Some(ticket) = self.begin_load(tail) else {
            return Ok(None);
        };
        let result = fetch(ticket.page).await;
        self.finish_load(ticket, result).map(Some)
    }
}

impl<T: Keyed> Default for PagedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::{movie, movie_page, series};
    use crate::api::fake::FakeCatalog;
    use crate::api::{CatalogApi, MediaKind};

    fn ids(list: &PagedList<MediaItem>) -> Vec<u64> {
        list.items().iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_initial_state() {
        let list: PagedList<MediaItem> = PagedList::new();
        assert!(list.is_empty());
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.total_pages(), 1);
        assert!(!list.has_more());
    }

    #[test]
    fn test_append_page_is_idempotent() {
        let page = movie_page(&[101, 102], 1, 3);
        let mut once = PagedList::new();
        once.append_page(page.clone());

        let mut twice = PagedList::new();
        assert_eq!(twice.append_page(page.clone()), 2);
        assert_eq!(twice.append_page(page), 0);

        assert_eq!(once.items(), twice.items());
        assert_eq!(twice.current_page(), 1);
        assert_eq!(twice.total_pages(), 3);
    }

    #[test]
    fn test_no_duplicate_ids_survive() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2, 3], 1, 3));
        list.append_page(movie_page(&[3, 4, 2, 5], 2, 3));
        list.append_page(movie_page(&[5, 5, 6], 3, 3));

        assert_eq!(ids(&list), vec![1, 2, 3, 4, 5, 6]);
        let unique: HashSet<_> = list.items().iter().map(|i| i.key()).collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn test_ids_do_not_collide_across_kinds() {
        let mut list = PagedList::new();
        list.append_page(Page::new(vec![movie(7, "Movie"), series(7, "Show")], 1, 1));
        assert_eq!(list.len(), 2);
        assert!(list.contains(&MediaKey::series(7)));
    }

    #[test]
    fn test_begin_load_requires_tail_and_more_pages() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[101, 102], 1, 3));

        assert_eq!(list.begin_load(MediaKey::movie(101)), None);
        assert_eq!(list.begin_load(MediaKey::series(102)), None);

        let ticket = list.begin_load(MediaKey::movie(102)).unwrap();
        assert_eq!(ticket.page, 2);
        assert!(list.is_loading());
    }

    #[test]
    fn test_begin_load_noop_on_last_page() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2], 2, 2));
        assert_eq!(list.begin_load(MediaKey::movie(2)), None);
        assert!(!list.is_loading());
    }

    #[test]
    fn test_duplicate_trigger_while_in_flight_is_rejected() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2], 1, 3));

        let ticket = list.begin_load(MediaKey::movie(2)).unwrap();
        assert_eq!(list.begin_load(MediaKey::movie(2)), None);

        list.finish_load(ticket, Ok(movie_page(&[3], 2, 3))).unwrap();
        assert!(list.begin_load(MediaKey::movie(3)).is_some());
    }

    #[test]
    fn test_failed_load_leaves_state_and_allows_retry() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2], 1, 3));

        let ticket = list.begin_load(MediaKey::movie(2)).unwrap();
        let err = list.finish_load(ticket, Err(ApiError::status(500))).unwrap_err();
        assert_eq!(err.status_code(), Some(500));

        assert_eq!(ids(&list), vec![1, 2]);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.begin_load(MediaKey::movie(2)).map(|t| t.page), Some(2));
    }

    #[test]
    fn test_result_after_reset_is_dropped() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2], 1, 3));
        let ticket = list.begin_load(MediaKey::movie(2)).unwrap();

        list.reset();
        let fresh = list.begin_first_load().unwrap();

        let outcome = list.finish_load(ticket, Ok(movie_page(&[3, 4], 2, 3))).unwrap();
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(list.is_empty());
        // the fresh load is still admitted and in flight
        assert!(list.is_loading());

        list.finish_load(fresh, Ok(movie_page(&[9], 1, 1))).unwrap();
        assert_eq!(ids(&list), vec![9]);
    }

    #[test]
    fn test_reset() {
        let mut list = PagedList::new();
        list.append_page(movie_page(&[1, 2], 2, 5));
        let generation = list.generation();

        list.reset();

        assert!(list.is_empty());
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.total_pages(), 1);
        assert_eq!(list.generation(), generation + 1);
        assert!(!list.contains(&MediaKey::movie(1)));
    }

    #[tokio::test]
    async fn test_trending_scroll_end_to_end() {
        let api = FakeCatalog::new()
            .with_discover(movie_page(&[101, 102], 1, 3))
            .with_discover(movie_page(&[102, 103], 2, 3));
        let mut list = PagedList::new();

        list.load_first_page(|page| api.discover(MediaKind::Movie, page))
            .await
            .unwrap();
        assert_eq!(ids(&list), vec![101, 102]);
        assert_eq!(list.current_page(), 1);
        assert!(list.has_more());

        // not the tail: nothing fetched
        let outcome = list
            .maybe_load_more(MediaKey::movie(101), |page| api.discover(MediaKind::Movie, page))
            .await
            .unwrap();
        assert_eq!(outcome, None);

        let outcome = list
            .maybe_load_more(MediaKey::movie(102), |page| api.discover(MediaKind::Movie, page))
            .await
            .unwrap();
        assert_eq!(outcome, Some(LoadOutcome::Appended(1)));
        assert_eq!(ids(&list), vec![101, 102, 103]);
        assert_eq!(list.current_page(), 2);

        assert_eq!(api.discover_calls(), vec![1, 2]);
    }
}
