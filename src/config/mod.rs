mod loader;
mod schema;

pub use loader::{config_path, load_config, read_config, save_config};
pub use schema::{ApiConfig, Config, SETTABLE_KEYS};
