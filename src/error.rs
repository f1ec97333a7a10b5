use thiserror::Error;

/// Application-wide result type
pub type Result<T> = anyhow::Result<T>;

/// Catalog API errors with typed variants for matching
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure, or a response with a status other than 200
    #[error("Network error: {message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("URL error: {0}")]
    Url(String),

    /// Failure that fits none of the other variants; the HTTP client never
    /// produces it
    #[allow(dead_code)]
    #[error("An unknown error occurred.")]
    Unknown,
}

impl ApiError {
    /// Error for a response that came back with a non-200 status
    pub fn status(code: u16) -> Self {
        ApiError::Network {
            status: Some(code),
            message: format!("Status code from server: {}", code),
        }
    }

    /// HTTP status carried by a network error, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Network { status, .. } => *status,
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found. Run 'cinedex config --set bearer_token=<token>' to set up.")]
    NotFound,

    #[error("Invalid config file: {0}")]
    Invalid(String),

    #[error("API bearer token is required. Run 'cinedex config --set bearer_token=<token>'.")]
    MissingToken,

    #[error("API base URL is required. Run 'cinedex config --set base_url=<url>'.")]
    MissingBaseUrl,

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Favourites store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Favourites database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
