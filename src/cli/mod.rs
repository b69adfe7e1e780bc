//! CLI module - argument parsing, interactive prompts and subcommands

mod args;
pub mod combine;
mod prompts;

pub use args::{Cli, Commands};
pub use prompts::*;
