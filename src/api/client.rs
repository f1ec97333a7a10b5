use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::media::Page;
use crate::config::ApiConfig;
use crate::error::ApiError;

/// List envelope shared by discover and search responses
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    page: u32,
    results: Vec<T>,
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

/// Typed GET + JSON decode against the catalog API.
///
/// One attempt per call: the request either decodes into `T` or fails with a
/// single [`ApiError`]. Retrying is left to callers.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cinedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network {
                status: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        }
    }

    /// Build the request URL. Fails without touching the network.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = format!("{}{}", self.base_url, path);

        if !query.is_empty() {
            let pairs: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        let parsed =
            Url::parse(&url).map_err(|e| ApiError::Url(format!("URL {} is invalid: {}", url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Url(format!("URL {} is not http(s)", url)));
        }

        Ok(parsed)
    }

    /// GET `path` and decode the body as `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;

        tracing::debug!("GET {}", path);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Request to {} failed: {}", path, e);
                ApiError::Network {
                    status: None,
                    message: e.to_string(),
                }
            })?;

        if response.status() != StatusCode::OK {
            tracing::warn!("{} answered HTTP {}", path, response.status());
            return Err(ApiError::status(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(|e| ApiError::Network {
            status: None,
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Failed to decode {}: {}", path, e);
            ApiError::Decoding(e.to_string())
        })
    }

    /// GET a paginated list endpoint and decode it into a [`Page`]
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, ApiError> {
        let data: ListResponse<T> = self.fetch(path, query).await?;

        tracing::debug!(
            "{} page {}/{}: {} results",
            path,
            data.page,
            data.total_pages,
            data.results.len()
        );

        Ok(Page {
            items: data.results,
            page: data.page.max(1),
            total_pages: data.total_pages.max(1),
            total_results: data.total_results,
        })
    }
}
