mod api;
mod cli;
mod config;
mod error;
mod favourites;
mod genres;
mod images;
mod paging;
mod search;
mod session;
mod trending;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, set, reset }) => {
            cli::commands::config(show, set, reset).await?;
        }
        Some(Commands::Trending { pages, favourites }) => {
            cli::commands::trending(pages, favourites).await?;
        }
        Some(Commands::Search {
            query,
            series,
            pages,
        }) => {
            cli::commands::search(query, cli::scope(series), pages).await?;
        }
        Some(Commands::Suggest { query, series }) => {
            cli::commands::suggest(query, cli::scope(series)).await?;
        }
        Some(Commands::Favourite { action }) => {
            cli::commands::favourite(action).await?;
        }
        None => {
            cli::commands::interactive().await?;
        }
    }

    Ok(())
}
