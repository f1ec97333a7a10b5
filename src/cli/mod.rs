mod args;
pub mod commands;
mod display;
mod interactive;

pub use args::{scope, Cli, Commands};
