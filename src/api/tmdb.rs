use async_trait::async_trait;
use serde::Deserialize;

use crate::api::client::CatalogClient;
use crate::api::media::{Genre, MediaItem, MediaKind, Movie, Page, Series};
use crate::error::ApiError;
use crate::images::ImageConfig;

/// Catalog endpoints used by the controllers.
///
/// Implemented over HTTP by [`TmdbCatalog`]; tests substitute in-memory fakes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Image base URL and size tables
    async fn configuration(&self) -> Result<ImageConfig, ApiError>;

    /// Full genre list for one media kind
    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError>;

    /// Trending (discover) list
    async fn discover(&self, kind: MediaKind, page: u32) -> Result<Page<MediaItem>, ApiError>;

    /// Search one scope by title
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError>;
}

/// TMDB-backed catalog
#[derive(Clone)]
pub struct TmdbCatalog {
    client: CatalogClient,
}

impl TmdbCatalog {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    async fn list(
        &self,
        kind: MediaKind,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<MediaItem>, ApiError> {
        match kind {
            MediaKind::Movie => Ok(self
                .client
                .fetch_page::<Movie>(path, query)
                .await?
                .map(MediaItem::from)),
            MediaKind::Series => Ok(self
                .client
                .fetch_page::<Series>(path, query)
                .await?
                .map(MediaItem::from)),
        }
    }
}

#[async_trait]
impl CatalogApi for TmdbCatalog {
    async fn configuration(&self) -> Result<ImageConfig, ApiError> {
        let data: ConfigurationResponse = self.client.fetch("/configuration", &[]).await?;
        Ok(ImageConfig::from_server(
            data.images.secure_base_url,
            &data.images.poster_sizes,
            &data.images.backdrop_sizes,
        ))
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError> {
        let path = format!("/genre/{}/list", kind.path());
        let data: GenreListResponse = self.client.fetch(&path, &[]).await?;
        Ok(data.genres)
    }

    async fn discover(&self, kind: MediaKind, page: u32) -> Result<Page<MediaItem>, ApiError> {
        let path = format!("/discover/{}", kind.path());
        self.list(kind, &path, &[("page", page.to_string())]).await
    }

    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let path = format!("/search/{}", kind.path());
        self.list(
            kind,
            &path,
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }
}

// Response types for the catalog API

#[derive(Debug, Deserialize)]
struct ConfigurationResponse {
    images: ImagesResponse,
    #[serde(default)]
    #[allow(dead_code)]
    change_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    secure_base_url: String,
    #[serde(default)]
    poster_sizes: Vec<String>,
    #[serde(default)]
    backdrop_sizes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}
