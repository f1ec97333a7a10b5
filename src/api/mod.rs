mod client;
mod media;
mod tmdb;

#[cfg(test)]
pub(crate) mod fake;

pub use client::CatalogClient;
pub use media::{Genre, MediaItem, MediaKey, MediaKind, Page};
pub use tmdb::{CatalogApi, TmdbCatalog};

#[cfg(test)]
pub(crate) use media::fixtures;
