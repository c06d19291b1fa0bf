use scanbridge::cli::commands::{CliArgs, Commands};
use scanbridge::cli::handlers::{handle_reconcile, handle_run, handle_version_check};
use scanbridge::util::logging::{self, parse_level, LoggingConfig};
use scanbridge::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    logging::init_logging(logging_config_from_args(&args));

    debug!("scanbridge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Reconcile(reconcile_args) => handle_reconcile(reconcile_args),
        Commands::Run(run_args) => handle_run(run_args, args.verbose),
        Commands::VersionCheck(check_args) => handle_version_check(check_args),
    };

    std::process::exit(exit_code);
}

/// `--log-level` wins, then `-v`/`-q`, then the environment
fn logging_config_from_args(args: &CliArgs) -> LoggingConfig {
    let config = LoggingConfig::from_env();
    if let Some(level_str) = &args.log_level {
        config.with_level(parse_level(level_str))
    } else if args.verbose {
        config.with_level(Level::DEBUG)
    } else if args.quiet {
        config.with_level(Level::ERROR)
    } else {
        config
    }
}
