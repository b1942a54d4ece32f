pub mod cli;
pub mod load_config;
pub mod report;

pub use cli::{run, Cli, RunStatus};
