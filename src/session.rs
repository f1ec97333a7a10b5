use std::sync::Arc;

use crate::api::{CatalogApi, MediaItem, MediaKind};
use crate::error::ApiError;
use crate::genres::GenreCache;
use crate::images::{AssetClass, ImageConfig};
use crate::search::SearchController;
use crate::trending::TrendingController;

/// Services shared by every list in one run of the client
pub struct Session {
    api: Arc<dyn CatalogApi>,
    images: ImageConfig,
    genres: Arc<GenreCache>,
    pub trending: TrendingController,
    pub search: SearchController,
    current_error: Option<ApiError>,
}

impl Session {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            trending: TrendingController::new(Arc::clone(&api)),
            search: SearchController::new(Arc::clone(&api)),
            api,
            images: ImageConfig::default(),
            genres: Arc::new(GenreCache::new()),
            current_error: None,
        }
    }

    /// Load image configuration, both genre lists and the first trending page.
    ///
    /// Each step runs even if an earlier one failed; the last failure is kept
    /// in [`current_error`](Self::current_error).
    pub async fn load_initial_content(&mut self) {
        self.load_configuration().await;
        self.load_genres().await;

        let result = self.trending.load_first_page().await;
        self.record(result);
    }

    pub async fn load_configuration(&mut self) {
        match self.api.configuration().await {
            Ok(images) => self.images = images,
            Err(e) => self.record_error(e),
        }
    }

    /// Movie and series genre lists, fetched concurrently
    pub async fn load_genres(&mut self) {
        let (movies, series) = tokio::join!(
            self.genres.load(self.api.as_ref(), MediaKind::Movie),
            self.genres.load(self.api.as_ref(), MediaKind::Series)
        );
        self.record(movies);
        self.record(series);
    }

    pub fn images(&self) -> &ImageConfig {
        &self.images
    }

    pub fn genres(&self) -> &GenreCache {
        &self.genres
    }

    /// Genre names of an item, in the item's order
    pub fn genre_names(&self, item: &MediaItem) -> Vec<String> {
        self.genres.names(item.genre_ids())
    }

    /// URL of an item's poster or backdrop at a rendition covering `width`
    pub fn image_url(&self, item: &MediaItem, width: u32, class: AssetClass) -> Option<String> {
        let path = match class {
            AssetClass::Poster => item.poster_path(),
            AssetClass::Backdrop => item.backdrop_path(),
        }?;
        self.images.image_url(path, width, class)
    }

    pub fn current_error(&self) -> Option<&ApiError> {
        self.current_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ApiError> {
        self.current_error
            .take()
            .or_else(|| self.search.take_error())
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) {
        if let Err(e) = result {
            self.record_error(e);
        }
    }

    fn record_error(&mut self, error: ApiError) {
        tracing::warn!("{}", error);
        self.current_error = Some(error);
    }
}
