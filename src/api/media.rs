use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of catalog entry. Ids are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Path segment used by the catalog API
    pub fn path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// Get a display label for the media kind
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movies",
            MediaKind::Series => "Series",
        }
    }

    /// The other search scope
    pub fn toggled(&self) -> Self {
        match self {
            MediaKind::Movie => MediaKind::Series,
            MediaKind::Series => MediaKind::Movie,
        }
    }

    pub fn from_path(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a catalog entry across kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub id: u64,
}

impl MediaKey {
    pub fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(MediaKind::Movie, id)
    }

    pub fn series(id: u64) -> Self {
        Self::new(MediaKind::Series, id)
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.path(), self.id)
    }
}

/// Genre reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A movie result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
}

/// A TV series result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

/// Unified catalog entry
#[derive(Debug, Clone, PartialEq)]
pub enum MediaItem {
    Movie(Movie),
    Series(Series),
}

impl MediaItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Movie(_) => MediaKind::Movie,
            MediaItem::Series(_) => MediaKind::Series,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            MediaItem::Movie(m) => m.id,
            MediaItem::Series(s) => s.id,
        }
    }

    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.kind(), self.id())
    }

    /// Display title (series use their name)
    pub fn title(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.title,
            MediaItem::Series(s) => &s.name,
        }
    }

    pub fn original_title(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.original_title,
            MediaItem::Series(s) => &s.original_name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.overview,
            MediaItem::Series(s) => &s.overview,
        }
    }

    /// Release date for movies, first air date for series (ISO date, may be empty)
    pub fn release_date(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.release_date,
            MediaItem::Series(s) => &s.first_air_date,
        }
    }

    /// Release year parsed from the date
    pub fn year(&self) -> Option<i32> {
        self.release_date()
            .split('-')
            .next()
            .and_then(|y| y.parse().ok())
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            MediaItem::Movie(m) => m.poster_path.as_deref(),
            MediaItem::Series(s) => s.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            MediaItem::Movie(m) => m.backdrop_path.as_deref(),
            MediaItem::Series(s) => s.backdrop_path.as_deref(),
        }
    }

    /// Average vote (0.0-10.0)
    pub fn vote_average(&self) -> f64 {
        match self {
            MediaItem::Movie(m) => m.vote_average,
            MediaItem::Series(s) => s.vote_average,
        }
    }

    pub fn vote_count(&self) -> u64 {
        match self {
            MediaItem::Movie(m) => m.vote_count,
            MediaItem::Series(s) => s.vote_count,
        }
    }

    pub fn popularity(&self) -> f64 {
        match self {
            MediaItem::Movie(m) => m.popularity,
            MediaItem::Series(s) => s.popularity,
        }
    }

    pub fn original_language(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.original_language,
            MediaItem::Series(s) => &s.original_language,
        }
    }

    pub fn genre_ids(&self) -> &[u32] {
        match self {
            MediaItem::Movie(m) => &m.genre_ids,
            MediaItem::Series(s) => &s.genre_ids,
        }
    }

    pub fn adult(&self) -> bool {
        match self {
            MediaItem::Movie(m) => m.adult,
            MediaItem::Series(s) => s.adult,
        }
    }
}

impl From<Movie> for MediaItem {
    fn from(movie: Movie) -> Self {
        MediaItem::Movie(movie)
    }
}

impl From<Series> for MediaItem {
    fn from(series: Series) -> Self {
        MediaItem::Series(series)
    }
}

/// One fetched page of results. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, total_pages: u32) -> Self {
        Self {
            total_results: items.len() as u64,
            items,
            page: page.max(1),
            total_pages: total_pages.max(1),
        }
    }

    /// Convert the items while keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_series_accessors_use_name_and_air_date() {
        let item = series(1399, "Game of Thrones");
        assert_eq!(item.title(), "Game of Thrones");
        assert_eq!(item.release_date(), "2019-01-01");
        assert_eq!(item.year(), Some(2019));
        assert_eq!(item.key(), MediaKey::series(1399));
    }

    #[test]
    fn test_keys_differ_across_kinds() {
        let m = movie(42, "Movie");
        let s = series(42, "Show");
        assert_eq!(m.id(), s.id());
        assert_ne!(m.key(), s.key());
    }

    #[test]
    fn test_year_missing_date() {
        let mut item = movie(1, "Undated");
        if let MediaItem::Movie(m) = &mut item {
            m.release_date = String::new();
        }
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_page_clamps_to_one() {
        let page: Page<MediaItem> = Page::new(vec![], 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_movie_decodes_sparse_json() {
        let movie: Movie = serde_json::from_str(r#"{"id": 7, "title": "Seven"}"#).unwrap();
        assert_eq!(movie.id, 7);
        assert!(movie.genre_ids.is_empty());
        assert!(movie.poster_path.is_none());
    }

    #[test]
    fn test_kind_paths() {
        assert_eq!(MediaKind::Movie.path(), "movie");
        assert_eq!(MediaKind::Series.path(), "tv");
        assert_eq!(MediaKind::from_path("tv"), Some(MediaKind::Series));
        assert_eq!(MediaKind::Movie.toggled(), MediaKind::Series);
    }
}
