use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build-model to analysis-engine property bridge
#[derive(Parser, Debug)]
#[command(
    name = "scanbridge",
    about = "Reconciles build-model properties into an analysis-ready property set",
    version,
    author,
    long_about = "scanbridge reads a snapshot of the build tool's project model, overlays \
                  user overrides and decrypted secrets, optionally crawls the project tree \
                  for undeclared sources and hands the effective property set to the \
                  analysis engine."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Enable debug logging (also turns on sonar.verbose for runs)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Print the effective property set for a project snapshot",
        long_about = "Loads a project snapshot, overlays user overrides and decrypted values \
                      and, when sonar.maven.scanAll is on, collects undeclared sources.\n\n\
                      Examples:\n  \
                      scanbridge reconcile project.yaml\n  \
                      scanbridge reconcile project.json -D sonar.maven.scanAll=false\n  \
                      scanbridge reconcile project.yaml --format json -o props.json"
    )]
    Reconcile(ReconcileArgs),

    #[command(
        about = "Run the full bootstrap against the dry-run engine",
        long_about = "Starts the engine, checks the server version, reconciles properties \
                      and hands them over for execution.\n\n\
                      Examples:\n  \
                      scanbridge run project.yaml --server-version 9.9\n  \
                      scanbridge run project.yaml -D sonar.host.url=https://sonarcloud.io"
    )]
    Run(RunArgs),

    #[command(
        about = "Check whether a server version is supported",
        long_about = "Exits with status 1 when the server version is below the minimum.\n\n\
                      Examples:\n  \
                      scanbridge version-check 10.4\n  \
                      scanbridge version-check 6.7 --min 7.9"
    )]
    VersionCheck(VersionCheckArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ReconcileArgs {
    #[arg(value_name = "SNAPSHOT", help = "Project snapshot file (JSON or YAML)")]
    pub snapshot: PathBuf,

    #[arg(
        short = 'D',
        long = "define",
        value_name = "KEY=VALUE",
        value_parser = parse_property,
        help = "User property override (repeatable)"
    )]
    pub defines: Vec<(String, String)>,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON or YAML map of already-decrypted property values"
    )]
    pub decrypted: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "properties",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_name = "SNAPSHOT", help = "Project snapshot file (JSON or YAML)")]
    pub snapshot: PathBuf,

    #[arg(
        short = 'D',
        long = "define",
        value_name = "KEY=VALUE",
        value_parser = parse_property,
        help = "User property override (repeatable)"
    )]
    pub defines: Vec<(String, String)>,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON or YAML map of already-decrypted property values"
    )]
    pub decrypted: Option<PathBuf>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Server version the dry-run engine reports (defaults to SCANBRIDGE_SERVER_VERSION)"
    )]
    pub server_version: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Minimum supported server version (defaults to SCANBRIDGE_MIN_SERVER_VERSION)"
    )]
    pub min_version: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct VersionCheckArgs {
    #[arg(value_name = "SERVER", help = "Server version to check")]
    pub server_version: String,

    #[arg(
        long = "min",
        value_name = "VERSION",
        help = "Minimum supported server version (defaults to SCANBRIDGE_MIN_SERVER_VERSION)"
    )]
    pub min_version: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Properties,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Properties => super::output::OutputFormat::Properties,
        }
    }
}

/// Splits `key=value` on the first `=`. The value may be empty, the key may not.
fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid property '{}': expected KEY=VALUE", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid property '{}': empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}
