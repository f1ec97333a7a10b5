use std::sync::Arc;

use crate::api::{CatalogApi, MediaItem, MediaKey, MediaKind, Page};
use crate::error::ApiError;
use crate::favourites::FavouriteStore;
use crate::paging::{LoadOutcome, LoadTicket, PagedList};

/// The default catalog list of currently popular movies
pub struct TrendingController {
    api: Arc<dyn CatalogApi>,
    list: PagedList<MediaItem>,
    favourites_only: bool,
}

impl TrendingController {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            list: PagedList::new(),
            favourites_only: false,
        }
    }

    pub fn api(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.api)
    }

    pub fn items(&self) -> &[MediaItem] {
        self.list.items()
    }

    pub fn list(&self) -> &PagedList<MediaItem> {
        &self.list
    }

    pub fn favourites_only(&self) -> bool {
        self.favourites_only
    }

    pub fn set_favourites_only(&mut self, enabled: bool) {
        self.favourites_only = enabled;
    }

    /// Whether scrolling to the end should fetch another page
    pub fn can_load_more(&self) -> bool {
        !self.favourites_only && self.list.has_more()
    }

    pub async fn load_first_page(&mut self) -> Result<Option<LoadOutcome>, ApiError> {
        let api = Arc::clone(&self.api);
        self.list
            .load_first_page(|page| async move { Self::fetch_page(api.as_ref(), page).await })
            .await
    }

    /// Fetch the next page when `tail` is the last loaded item
    pub async fn load_more_if_needed(
        &mut self,
        tail: MediaKey,
    ) -> Result<Option<LoadOutcome>, ApiError> {
        if self.favourites_only {
            return Ok(None);
        }
        let api = Arc::clone(&self.api);
        self.list
            .maybe_load_more(tail, |page| async move {
                Self::fetch_page(api.as_ref(), page).await
            })
            .await
    }

    /// Admit a next-page load to be fetched with [`fetch_page`] and completed
    /// with [`finish_load`]
    ///
    /// [`fetch_page`]: Self::fetch_page
    /// [`finish_load`]: Self::finish_load
    pub fn begin_load_more(&mut self, tail: MediaKey) -> Option<LoadTicket> {
        if self.favourites_only {
            return None;
        }
        self.list.begin_load(tail)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Page<MediaItem>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        self.list.finish_load(ticket, result)
    }

    pub async fn fetch_page(api: &dyn CatalogApi, page: u32) -> Result<Page<MediaItem>, ApiError> {
        api.discover(MediaKind::Movie, page).await
    }

    /// Items to show: everything, or only favourites when the filter is on.
    /// Store failures count as "not a favourite".
    pub fn visible<'a>(&'a self, store: &dyn FavouriteStore) -> Vec<&'a MediaItem> {
        self.list
            .items()
            .iter()
            .filter(|item| {
                !self.favourites_only || store.exists(item.key()).unwrap_or_else(|e| {
                    tracing::warn!("Favourite lookup failed for {}: {}", item.key(), e);
                    false
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeCatalog;
    use crate::api::fixtures::movie_page;
    use crate::favourites::SqliteFavourites;

    fn controller(api: FakeCatalog) -> (Arc<FakeCatalog>, TrendingController) {
        let api = Arc::new(api);
        let controller = TrendingController::new(api.clone());
        (api, controller)
    }

    #[tokio::test]
    async fn test_load_and_scroll() {
        let (api, mut trending) = controller(
            FakeCatalog::new()
                .with_discover(movie_page(&[101, 102], 1, 3))
                .with_discover(movie_page(&[102, 103], 2, 3)),
        );

        trending.load_first_page().await.unwrap();
        assert!(trending.can_load_more());

        trending.load_more_if_needed(MediaKey::movie(102)).await.unwrap();
        // 102 is no longer the tail
        trending.load_more_if_needed(MediaKey::movie(102)).await.unwrap();

        let ids: Vec<u64> = trending.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![101, 102, 103]);
        assert_eq!(api.discover_calls(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_favourites_only_blocks_loading_and_filters() {
        let (api, mut trending) = controller(
            FakeCatalog::new()
                .with_discover(movie_page(&[1, 2, 3], 1, 2))
                .with_discover(movie_page(&[4], 2, 2)),
        );
        trending.load_first_page().await.unwrap();

        let store = SqliteFavourites::open_in_memory().unwrap();
        store.add(MediaKey::movie(2)).unwrap();

        trending.set_favourites_only(true);
        assert!(!trending.can_load_more());
        assert_eq!(trending.load_more_if_needed(MediaKey::movie(3)).await.unwrap(), None);

        let visible: Vec<u64> = trending.visible(&store).iter().map(|i| i.id()).collect();
        assert_eq!(visible, vec![2]);
        assert_eq!(api.discover_calls(), vec![1]);

        trending.set_favourites_only(false);
        assert_eq!(trending.visible(&store).len(), 3);
    }

    #[tokio::test]
    async fn test_failed_page_is_retryable() {
        let (api, mut trending) = controller(
            FakeCatalog::new().with_discover(movie_page(&[1, 2], 1, 2)),
        );
        trending.load_first_page().await.unwrap();

        let err = trending.load_more_if_needed(MediaKey::movie(2)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(trending.items().len(), 2);

        api.set_discover(2, Ok(movie_page(&[3], 2, 2)));
        trending.load_more_if_needed(MediaKey::movie(2)).await.unwrap();
        assert_eq!(trending.items().len(), 3);
        assert!(!trending.can_load_more());
    }

    #[tokio::test]
    async fn test_split_load_keeps_one_in_flight() {
        let (api, mut trending) = controller(
            FakeCatalog::new()
                .with_discover(movie_page(&[1, 2], 1, 3))
                .with_discover(movie_page(&[3], 2, 3)),
        );
        trending.load_first_page().await.unwrap();

        let ticket = trending.begin_load_more(MediaKey::movie(2)).unwrap();
        assert_eq!(trending.begin_load_more(MediaKey::movie(2)), None);
        assert!(trending.list().is_loading());

        let result = TrendingController::fetch_page(api.as_ref(), ticket.page).await;
        assert_eq!(trending.finish_load(ticket, result), Ok(LoadOutcome::Appended(1)));
        assert!(!trending.list().is_loading());

        trending.set_favourites_only(true);
        assert_eq!(trending.begin_load_more(MediaKey::movie(3)), None);
    }
}
