use std::sync::Arc;

use anyhow::Context;

use crate::api::{CatalogApi, CatalogClient, MediaKey, MediaKind, TmdbCatalog};
use crate::cli::args::{scope as scope_for, FavouriteAction};
use crate::cli::display::{print_items, print_suggestions};
use crate::config::{config_path, load_config, read_config, save_config, Config, SETTABLE_KEYS};
use crate::error::{ConfigError, Result};
use crate::favourites::{FavouriteStore, SqliteFavourites};
use crate::session::Session;

/// Build the catalog client from a validated config
pub fn connect(config: &Config) -> Result<Arc<dyn CatalogApi>> {
    let client = CatalogClient::new(&config.api).context("Failed to set up the catalog client")?;
    Ok(Arc::new(TmdbCatalog::new(client)))
}

/// Session with image configuration and genres loaded
async fn reference_session(config: &Config) -> Result<Session> {
    let mut session = Session::new(connect(config)?);
    session.load_configuration().await;
    session.load_genres().await;
    report_error(&mut session);
    Ok(session)
}

/// Print a startup failure without aborting; the lists still work without
/// images or genres
fn report_error(session: &mut Session) {
    if let Some(e) = session.take_error() {
        eprintln!("Warning: {}", e);
    }
}

/// Handle the config command
pub async fn config(show: bool, set: Option<String>, reset: bool) -> Result<()> {
    if reset {
        if config_path().exists() {
            std::fs::remove_file(config_path())?;
            println!("Configuration reset.");
        } else {
            println!("No configuration file found.");
        }
        return Ok(());
    }

    if let Some(key_value) = set {
        let Some((key, value)) = key_value.split_once('=') else {
            println!("Invalid format. Use: --set key=value");
            print_keys();
            return Ok(());
        };

        let mut config = match read_config(&config_path()) {
            Ok(config) => config,
            Err(ConfigError::NotFound) => Config::default(),
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = config.set(key.trim(), value.trim()) {
            println!("{}", e);
            print_keys();
            return Ok(());
        }

        save_config(&config)?;
        println!("Configuration updated.");
        return Ok(());
    }

    if show {
        match read_config(&config_path()) {
            Ok(config) => {
                println!("Configuration file: {}\n", config_path().display());
                println!("[api]");
                println!("base_url = \"{}\"", config.api.base_url);
                if config.api.bearer_token.is_empty() {
                    println!("bearer_token = (not configured)");
                } else {
                    let prefix: String = config.api.bearer_token.chars().take(8).collect();
                    println!("bearer_token = \"{}...\"", prefix);
                }
                println!("timeout_secs = {}", config.api.timeout_secs);
                println!("\n[search]");
                println!("debounce_ms = {}", config.search.debounce_ms);
                println!("\n[images]");
                println!("poster_width = {}", config.images.poster_width);
                println!("backdrop_width = {}", config.images.backdrop_width);
            }
            Err(e) => {
                println!("Error: {}", e);
            }
        }
        return Ok(());
    }

    // Default: show help
    println!("Usage: cinedex config [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --show         Show current configuration");
    println!("  --set KEY=VAL  Set a configuration value");
    println!("  --reset        Reset configuration to defaults");
    println!();
    print_keys();

    Ok(())
}

fn print_keys() {
    println!("Available keys for --set:");
    for (key, help) in SETTABLE_KEYS {
        println!("  {:<16}{}", key, help);
    }
}

/// Handle the trending command
pub async fn trending(pages: u32, favourites_only: bool) -> Result<()> {
    let config = load_config()?;
    let mut session = Session::new(connect(&config)?);
    session.load_initial_content().await;

    if session.trending.items().is_empty() {
        if let Some(e) = session.take_error() {
            return Err(e).context("Failed to load trending movies");
        }
    }
    report_error(&mut session);

    while session.trending.list().current_page() < pages && session.trending.can_load_more() {
        let Some(tail) = session.trending.items().last().map(|i| i.key()) else {
            break;
        };
        if session.trending.load_more_if_needed(tail).await?.is_none() {
            break;
        }
    }

    let store = SqliteFavourites::open().context("Failed to open favourites")?;
    session.trending.set_favourites_only(favourites_only);

    let list = session.trending.list();
    println!(
        "Trending movies (page {}/{})\n",
        list.current_page(),
        list.total_pages()
    );
    print_items(&session, &config, session.trending.visible(&store), Some(&store));

    Ok(())
}

/// Handle the search command
pub async fn search(query: String, scope: MediaKind, pages: u32) -> Result<()> {
    let config = load_config()?;
    let mut session = reference_session(&config).await?;

    session.search.set_scope(scope).await?;
    session.search.set_query(query.clone());
    session.search.submit().await?;

    while session.search.results().current_page() < pages {
        let Some(tail) = session.search.results().items().last().map(|i| i.key()) else {
            break;
        };
        if session.search.load_more(tail).await?.is_none() {
            break;
        }
    }

    let store = SqliteFavourites::open().context("Failed to open favourites")?;
    let results = session.search.results();
    println!(
        "{} matching '{}' (page {}/{})\n",
        scope.label(),
        query,
        results.current_page(),
        results.total_pages()
    );
    print_items(&session, &config, results.items(), Some(&store));

    Ok(())
}

/// Handle the suggest command
pub async fn suggest(query: String, scope: MediaKind) -> Result<()> {
    let config = load_config()?;
    let mut session = Session::new(connect(&config)?);

    session.search.set_scope(scope).await?;
    session.search.set_query(query.clone());
    session.search.on_query_settled(&query).await?;

    print_suggestions(session.search.suggestions());
    Ok(())
}

/// Handle the favourite command
pub async fn favourite(action: FavouriteAction) -> Result<()> {
    let store = SqliteFavourites::open().context("Failed to open favourites")?;

    match action {
        FavouriteAction::Add { id, series, title } => {
            let key = MediaKey::new(scope_for(series), id);
            store.add_titled(key, title.as_deref())?;
            println!("Added {} to favourites.", key);
        }
        FavouriteAction::Remove { id, series } => {
            let key = MediaKey::new(scope_for(series), id);
            if store.exists(key)? {
                store.remove(key)?;
                println!("Removed {} from favourites.", key);
            } else {
                println!("{} is not a favourite.", key);
            }
        }
        FavouriteAction::List => {
            let favourites = store.list()?;
            if favourites.is_empty() {
                println!("No favourites yet.");
            }
            for favourite in favourites {
                println!(
                    "  {:<12} {:<40} {}",
                    favourite.key.to_string(),
                    favourite.title.as_deref().unwrap_or("-"),
                    favourite.added_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}

/// Run interactive mode (default)
pub async fn interactive() -> Result<()> {
    let config = match load_config() {
        Ok(c) => c,
        Err(e @ (ConfigError::NotFound | ConfigError::MissingToken)) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let store = SqliteFavourites::open().context("Failed to open favourites")?;
    let mut session = Session::new(connect(&config)?);
    session.load_initial_content().await;
    report_error(&mut session);

    crate::cli::interactive::run(&config, session, &store).await
}
