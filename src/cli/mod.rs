pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ReconcileArgs, RunArgs, VersionCheckArgs};
pub use output::{OutputFormat, OutputFormatter};
