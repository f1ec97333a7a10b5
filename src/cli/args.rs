use clap::{Parser, Subcommand};

use crate::api::MediaKind;

/// cinedex - Browse trending movies and search TMDB from the terminal
#[derive(Parser)]
#[command(name = "cinedex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a config value (format: key=value)
        #[arg(long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Show trending movies
    #[command(alias = "t")]
    Trending {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Only show favourites
        #[arg(long)]
        favourites: bool,
    },

    /// Search for movies or TV series
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Search TV series instead of movies
        #[arg(long)]
        series: bool,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List title suggestions for a query
    Suggest {
        query: String,

        /// Suggest TV series instead of movies
        #[arg(long)]
        series: bool,
    },

    /// Manage favourites
    #[command(alias = "fav")]
    Favourite {
        #[command(subcommand)]
        action: FavouriteAction,
    },
}

#[derive(Subcommand)]
pub enum FavouriteAction {
    /// Mark a title as favourite
    Add {
        id: u64,

        #[arg(long)]
        series: bool,

        /// Title to show in the favourites list
        #[arg(long)]
        title: Option<String>,
    },

    /// Remove a favourite
    Remove {
        id: u64,

        #[arg(long)]
        series: bool,
    },

    /// List favourites
    List,
}

/// Scope selected by a `--series` flag
pub fn scope(series: bool) -> MediaKind {
    if series {
        MediaKind::Series
    } else {
        MediaKind::Movie
    }
}
