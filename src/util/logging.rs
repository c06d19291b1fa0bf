//! Structured logging setup for scanbridge
//!
//! Output goes to stderr so that the effective property set printed on
//! stdout stays machine-readable. The binary resolves its level from the
//! command line first and from `SCANBRIDGE_LOG_LEVEL` otherwise.
//!
//! # Example
//!
//! ```no_run
//! use scanbridge::util::logging::{self, LoggingConfig};
//!
//! logging::init_logging(LoggingConfig::from_env());
//!
//! tracing::info!("Application started");
//! tracing::debug!(root = "/proj", "Walking project tree");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level for events from this crate; ignored when `RUST_LOG` is set
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `SCANBRIDGE_LOG_LEVEL` and `SCANBRIDGE_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("SCANBRIDGE_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);
        let use_json = env::var("SCANBRIDGE_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        Self { level, use_json }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Parses a log level from a string
///
/// Returns `Level::INFO` for anything unrecognized.
///
/// ```
/// use scanbridge::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise `scanbridge=<level>`
fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_ok() {
        return filter;
    }
    match format!("scanbridge={}", level).parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Installs the global subscriber once; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);
        let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}

/// Whether debug events from this crate would be recorded
pub fn is_debug_enabled() -> bool {
    tracing::enabled!(Level::DEBUG)
}
