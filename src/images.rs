//! Image rendition selection.
//!
//! The catalog serves every poster and backdrop in a fixed set of widths
//! ("buckets") advertised by `/configuration`. Picking the smallest bucket
//! that covers the on-screen width keeps downloads small without upscaling.

use std::fmt;

/// Which size table applies to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Poster,
    Backdrop,
}

/// Resolved rendition for a desired width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// A server bucket, rendered as `w{width}`
    Width(u32),
    /// Full resolution alias
    Original,
    /// No size table loaded yet; render a placeholder
    Unavailable,
}

impl ImageSize {
    /// Path segment for the image URL, `None` when unavailable
    pub fn segment(&self) -> Option<String> {
        match self {
            ImageSize::Width(w) => Some(format!("w{}", w)),
            ImageSize::Original => Some("original".to_string()),
            ImageSize::Unavailable => None,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Width(w) => write!(f, "w{}", w),
            ImageSize::Original => f.write_str("original"),
            ImageSize::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Pick the smallest bucket >= `desired_width`.
///
/// `table` must be sorted ascending. Wider than the largest bucket resolves to
/// [`ImageSize::Original`]; an empty table to [`ImageSize::Unavailable`].
pub fn resolve(desired_width: u32, table: &[u32]) -> ImageSize {
    let Some(&max) = table.last() else {
        return ImageSize::Unavailable;
    };

    if desired_width > max {
        return ImageSize::Original;
    }

    table
        .iter()
        .find(|&&w| w >= desired_width)
        .map(|&w| ImageSize::Width(w))
        .unwrap_or(ImageSize::Unavailable)
}

/// Parse server size names (`"w92"`, `"original"`, `"h632"`) into bucket widths.
/// Entries that are not `w<number>` are dropped; order is preserved.
pub fn parse_size_table(sizes: &[String]) -> Vec<u32> {
    sizes
        .iter()
        .filter_map(|s| s.strip_prefix('w'))
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// Image configuration fetched once at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageConfig {
    base_url: Option<String>,
    poster_sizes: Vec<u32>,
    backdrop_sizes: Vec<u32>,
}

impl ImageConfig {
    pub fn new(base_url: impl Into<String>, poster_sizes: Vec<u32>, backdrop_sizes: Vec<u32>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            poster_sizes,
            backdrop_sizes,
        }
    }

    /// Build from the raw `/configuration` payload
    pub fn from_server(base_url: String, poster_sizes: &[String], backdrop_sizes: &[String]) -> Self {
        Self::new(
            base_url,
            parse_size_table(poster_sizes),
            parse_size_table(backdrop_sizes),
        )
    }

    pub fn is_loaded(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn table(&self, class: AssetClass) -> &[u32] {
        match class {
            AssetClass::Poster => &self.poster_sizes,
            AssetClass::Backdrop => &self.backdrop_sizes,
        }
    }

    pub fn size_for(&self, desired_width: u32, class: AssetClass) -> ImageSize {
        resolve(desired_width, self.table(class))
    }

    /// Full URL for an image path, or `None` if a placeholder should be shown
    pub fn image_url(&self, path: &str, desired_width: u32, class: AssetClass) -> Option<String> {
        let base = self.base_url.as_deref()?;
        let size = self.size_for(desired_width, class).segment()?;
        Some(format!("{}{}{}", base, size, path))
    }
}
