//! In-memory catalog used by controller tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::media::{Genre, MediaItem, MediaKind, Page};
use crate::api::tmdb::CatalogApi;
use crate::error::ApiError;
use crate::images::ImageConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Configuration,
    Genres(MediaKind),
    Discover(MediaKind, u32),
    Search(MediaKind, String, u32),
}

type PageKey = (MediaKind, Option<String>, u32);

#[derive(Default)]
pub struct FakeCatalog {
    configuration: Option<ImageConfig>,
    genres: HashMap<MediaKind, Vec<Genre>>,
    pages: Mutex<HashMap<PageKey, Result<Page<MediaItem>, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(mut self, config: ImageConfig) -> Self {
        self.configuration = Some(config);
        self
    }

    pub fn with_genres(mut self, kind: MediaKind, genres: Vec<Genre>) -> Self {
        self.genres.insert(kind, genres);
        self
    }

    pub fn with_discover(self, page: Page<MediaItem>) -> Self {
        self.set((MediaKind::Movie, None, page.page), Ok(page));
        self
    }

    pub fn with_search(self, kind: MediaKind, query: &str, page: Page<MediaItem>) -> Self {
        self.set((kind, Some(query.to_string()), page.page), Ok(page));
        self
    }

    /// Replace the answer for a discover page after construction
    pub fn set_discover(&self, page: u32, result: Result<Page<MediaItem>, ApiError>) {
        self.set((MediaKind::Movie, None, page), result);
    }

    fn set(&self, key: PageKey, result: Result<Page<MediaItem>, ApiError>) {
        self.pages.lock().unwrap().insert(key, result);
    }

    fn answer(&self, key: PageKey) -> Result<Page<MediaItem>, ApiError> {
        self.pages
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::status(404)))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(MediaKind, String, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(kind, query, page) => Some((kind, query, page)),
                _ => None,
            })
            .collect()
    }

    pub fn discover_calls(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Discover(_, page) => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn configuration(&self) -> Result<ImageConfig, ApiError> {
        self.record(Call::Configuration);
        self.configuration
            .clone()
            .ok_or_else(|| ApiError::status(401))
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError> {
        self.record(Call::Genres(kind));
        self.genres
            .get(&kind)
            .cloned()
            .ok_or_else(|| ApiError::Decoding("missing field `genres`".to_string()))
    }

    async fn discover(&self, kind: MediaKind, page: u32) -> Result<Page<MediaItem>, ApiError> {
        self.record(Call::Discover(kind, page));
        self.answer((kind, None, page))
    }

    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        self.record(Call::Search(kind, query.to_string(), page));
        self.answer((kind, Some(query.to_string()), page))
    }
}
