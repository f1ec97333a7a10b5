use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::api::{CatalogApi, Genre, MediaKind};
use crate::error::ApiError;

/// Session-wide genre lookup table.
///
/// Movie and series genres share one id space on the catalog, so both lists
/// merge into a single map. The first name seen for an id wins.
#[derive(Debug, Default)]
pub struct GenreCache {
    genres: RwLock<HashMap<u32, Genre>>,
}

impl GenreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the genre list for `kind` and merge it in. Safe to call
    /// concurrently for both kinds.
    pub async fn load(&self, api: &dyn CatalogApi, kind: MediaKind) -> Result<usize, ApiError> {
        let genres = api.genres(kind).await?;
        let added = self.merge(genres);
        tracing::debug!("Loaded {} new {} genres", added, kind.path());
        Ok(added)
    }

    /// Insert genres whose id is not cached yet; returns how many were added
    pub fn merge(&self, genres: impl IntoIterator<Item = Genre>) -> usize {
        let mut map = self.genres.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        for genre in genres {
            map.entry(genre.id).or_insert(genre);
        }
        map.len() - before
    }

    /// Genres for `ids` in input order; unknown ids are skipped
    pub fn lookup(&self, ids: &[u32]) -> Vec<Genre> {
        let map = self.genres.read().unwrap_or_else(PoisonError::into_inner);
        ids.iter().filter_map(|id| map.get(id).cloned()).collect()
    }

    pub fn names(&self, ids: &[u32]) -> Vec<String> {
        self.lookup(ids).into_iter().map(|g| g.name).collect()
    }

    pub fn len(&self) -> usize {
        self.genres.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
