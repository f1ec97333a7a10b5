use crate::api::MediaItem;
use crate::config::Config;
use crate::favourites::FavouriteStore;
use crate::images::AssetClass;
use crate::session::Session;

/// One-line summary of an item
pub fn format_row(item: &MediaItem, genres: &[String], favourite: bool) -> String {
    let mut row = String::new();

    row.push_str(if favourite { "★ " } else { "  " });
    row.push_str(&format!("{:>8}  {}", item.id(), item.title()));

    if let Some(year) = item.year() {
        row.push_str(&format!(" ({})", year));
    }

    if item.vote_count() > 0 {
        row.push_str(&format!(
            "  {:.1}/10 ({} votes)",
            item.vote_average(),
            item.vote_count()
        ));
    }

    if !genres.is_empty() {
        row.push_str(&format!("  [{}]", genres.join(", ")));
    }

    row
}

/// Print items with genres, favourite marks and image URLs
pub fn print_items<'a>(
    session: &Session,
    config: &Config,
    items: impl IntoIterator<Item = &'a MediaItem>,
    store: Option<&dyn FavouriteStore>,
) {
    let mut count = 0;
    for item in items {
        let favourite = store
            .map(|s| s.exists(item.key()).unwrap_or(false))
            .unwrap_or(false);
        println!(
            "{}",
            format_row(item, &session.genre_names(item), favourite)
        );

        if let Some(url) = session.image_url(item, config.images.poster_width, AssetClass::Poster) {
            println!("            poster:   {}", url);
        }
        if let Some(url) =
            session.image_url(item, config.images.backdrop_width, AssetClass::Backdrop)
        {
            println!("            backdrop: {}", url);
        }
        count += 1;
    }

    if count == 0 {
        println!("No results.");
    }
}

pub fn print_suggestions(suggestions: &[String]) {
    if suggestions.is_empty() {
        println!("No suggestions.");
        return;
    }
    for suggestion in suggestions {
        println!("  {}", suggestion);
    }
}
