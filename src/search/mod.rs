mod controller;
mod debounce;

pub use controller::{SearchController, SearchRequest};
pub use debounce::{spawn_debouncer, DEFAULT_QUIET_PERIOD};
