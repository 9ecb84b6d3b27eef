//! CLI command handlers, one per file.

mod config;
mod docs;
mod fetch;
mod flatten;
mod locate;

pub use config::run_config;
pub use docs::{run_completions, run_man};
pub use fetch::{run_fetch, FetchOverrides};
pub use flatten::run_flatten;
pub use locate::run_locate;
