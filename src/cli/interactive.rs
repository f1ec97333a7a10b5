//! Line-oriented interactive mode.
//!
//! Plain lines are query edits and flow through the debouncer; lines starting
//! with `:` are commands.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::api::{MediaItem, MediaKey, MediaKind, Page};
use crate::cli::display::{print_items, print_suggestions};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::favourites::SqliteFavourites;
use crate::paging::{LoadOutcome, LoadTicket};
use crate::search::{spawn_debouncer, SearchRequest};
use crate::session::Session;
use crate::trending::TrendingController;

const HELP: &str = "\
Type to search. Commands:
  :go         search for the current query
  :scope      switch between movies and series
  :more       load the next page of the current list
  :fav <id>   toggle a favourite in the current list
  :trending   show trending movies
  :favs       toggle favourites-only trending
  :help       show this help
  :q          quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Edit(String),
    Submit,
    ToggleScope,
    More,
    Favourite(u64),
    Trending,
    FavouritesOnly,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Input::Edit(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("go"), None) => Input::Submit,
        (Some("scope"), None) => Input::ToggleScope,
        (Some("more"), None) => Input::More,
        (Some("fav"), Some(id)) => match id.parse() {
            Ok(id) => Input::Favourite(id),
            Err(_) => Input::Unknown(line.to_string()),
        },
        (Some("trending"), None) => Input::Trending,
        (Some("favs"), None) => Input::FavouritesOnly,
        (Some("help"), None) => Input::Help,
        (Some("q" | "quit"), None) => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// Which list `:more` and `:fav` act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Trending,
    Search,
}

/// A catalog fetch that finished in the background
enum Fetched {
    Search(SearchRequest, std::result::Result<Page<MediaItem>, ApiError>),
    Trending(LoadTicket, std::result::Result<Page<MediaItem>, ApiError>),
}

struct Interactive<'a> {
    config: &'a Config,
    session: Session,
    store: &'a SqliteFavourites,
    view: View,
    fetched: mpsc::UnboundedSender<Fetched>,
}

/// Run the interactive loop until `:q` or end of input.
///
/// Catalog fetches run as spawned tasks; their results come back through a
/// channel so input keeps being read while a request is pending.
pub async fn run(config: &Config, session: Session, store: &SqliteFavourites) -> Result<()> {
    let (fetched, mut done) = mpsc::unbounded_channel();
    let mut app = Interactive {
        config,
        session,
        store,
        view: View::Trending,
        fetched,
    };

    let (edits, mut settled) = spawn_debouncer(config.search.quiet_period());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n", HELP);
    app.show_trending();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Edit(query) => {
                        app.session.search.set_query(query.clone());
                        // the debouncer only stops when this loop exits
                        edits.send(query).ok();
                    }
                    input => app.handle(input),
                }
            }
            Some(query) = settled.recv() => app.on_query_settled(&query),
            Some(fetched) = done.recv() => app.on_fetched(fetched),
        }
    }

    Ok(())
}

impl Interactive<'_> {
    fn handle(&mut self, input: Input) {
        match input {
            Input::Submit => match self.session.search.begin_submit() {
                Some(request) => {
                    self.view = View::Search;
                    println!("Searching...");
                    self.spawn_search(request);
                }
                None => println!("Type a query first."),
            },
            Input::ToggleScope => {
                let scope = self.session.search.scope().toggled();
                println!("Scope: {}", scope.label());
                if let Some(request) = self.session.search.change_scope(scope) {
                    self.spawn_search(request);
                }
            }
            Input::More => self.load_more(),
            Input::Favourite(id) => self.toggle_favourite(id),
            Input::Trending => {
                self.view = View::Trending;
                self.show_trending();
            }
            Input::FavouritesOnly => {
                let enabled = !self.session.trending.favourites_only();
                self.session.trending.set_favourites_only(enabled);
                println!("Favourites only: {}", if enabled { "on" } else { "off" });
                self.view = View::Trending;
                self.show_trending();
            }
            Input::Help => println!("{}", HELP),
            Input::Unknown(line) => println!("Unknown command '{}'. Type :help.", line),
            Input::Edit(_) | Input::Quit => {}
        }
    }

    fn on_query_settled(&mut self, query: &str) {
        if let Some(request) = self.session.search.settle(query) {
            self.spawn_search(request);
        } else if self.session.search.query().trim().is_empty() && self.view == View::Search {
            self.view = View::Trending;
            self.show_trending();
        }
    }

    fn on_fetched(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Search(request, result) => {
                let suggestions = request.is_suggestions();
                match self.session.search.apply(request, result) {
                    Ok(LoadOutcome::Stale) => {}
                    Ok(LoadOutcome::Appended(_)) if suggestions => self.show_suggestions(),
                    Ok(LoadOutcome::Appended(_)) => {
                        if self.view == View::Search {
                            self.show_results();
                        }
                    }
                    // recorded by the controller
                    Err(_) => self.report_error(),
                }
            }
            Fetched::Trending(ticket, result) => {
                match self.session.trending.finish_load(ticket, result) {
                    Ok(LoadOutcome::Stale) => {}
                    Ok(LoadOutcome::Appended(_)) => {
                        if self.view == View::Trending {
                            self.show_trending();
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
    }

    fn spawn_search(&self, request: SearchRequest) {
        let api = self.session.search.api();
        let fetched = self.fetched.clone();
        tokio::spawn(async move {
            let result = request.fetch(api.as_ref()).await;
            fetched.send(Fetched::Search(request, result)).ok();
        });
    }

    fn spawn_trending(&self, ticket: LoadTicket) {
        let api = self.session.trending.api();
        let fetched = self.fetched.clone();
        tokio::spawn(async move {
            let result = TrendingController::fetch_page(api.as_ref(), ticket.page).await;
            fetched.send(Fetched::Trending(ticket, result)).ok();
        });
    }

    fn load_more(&mut self) {
        let (tail, loading) = match self.view {
            View::Trending => (
                self.session.trending.items().last().map(MediaItem::key),
                self.session.trending.list().is_loading(),
            ),
            View::Search => (
                self.session.search.results().items().last().map(MediaItem::key),
                self.session.search.results().is_loading(),
            ),
        };
        if loading {
            println!("Still loading...");
            return;
        }
        let Some(tail) = tail else {
            println!("Nothing more to load.");
            return;
        };

        match self.view {
            View::Trending => match self.session.trending.begin_load_more(tail) {
                Some(ticket) => self.spawn_trending(ticket),
                None => println!("Nothing more to load."),
            },
            View::Search => match self.session.search.begin_load_more(tail) {
                Some(request) => self.spawn_search(request),
                None => println!("Nothing more to load."),
            },
        }
    }

    fn toggle_favourite(&mut self, id: u64) {
        let kind = match self.view {
            View::Trending => MediaKind::Movie,
            View::Search => self.session.search.scope(),
        };
        let key = MediaKey::new(kind, id);

        let title = self.find_title(key);
        let result = self.store.toggle_titled(key, title.as_deref());

        match result {
            Ok(true) => println!("★ Added {} to favourites.", key),
            Ok(false) => println!("Removed {} from favourites.", key),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    fn find_title(&self, key: MediaKey) -> Option<String> {
        self.session
            .trending
            .items()
            .iter()
            .chain(self.session.search.results().items())
            .find(|item| item.key() == key)
            .map(|item| item.title().to_string())
    }

    fn show_trending(&mut self) {
        self.report_error();
        let list = self.session.trending.list();
        println!(
            "\nTrending movies (page {}/{})",
            list.current_page(),
            list.total_pages()
        );
        let visible = self.session.trending.visible(self.store);
        print_items(&self.session, self.config, visible, Some(self.store));
    }

    fn show_results(&mut self) {
        self.report_error();
        let results = self.session.search.results();
        println!(
            "\n{} matching '{}' (page {}/{})",
            self.session.search.scope().label(),
            self.session.search.query(),
            results.current_page(),
            results.total_pages()
        );
        print_items(&self.session, self.config, results.items(), Some(self.store));
    }

    fn show_suggestions(&self) {
        println!(
            "\nSuggestions ({}):",
            self.session.search.scope().label()
        );
        print_suggestions(self.session.search.suggestions());
    }

    fn report_error(&mut self) {
        if let Some(e) = self.session.take_error() {
            eprintln!("Warning: {}", e);
        }
    }
}
