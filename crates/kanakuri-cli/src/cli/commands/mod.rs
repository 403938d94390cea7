//! CLI command handlers. Each command is in its own file.

mod checksum;
mod config;
mod docs;
mod fetch;

pub use checksum::run_checksum;
pub use config::run_config;
pub use docs::{run_completions, run_man};
pub use fetch::{run_fetch, FetchArgs};

#[cfg(test)]
pub use fetch::parse_header;
