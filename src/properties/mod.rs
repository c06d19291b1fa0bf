//! Property keys and the property map handed to the analysis engine

pub mod csv;
pub mod decrypt;

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub use decrypt::{NoopDecryptor, PropertyDecryptor, StaticDecryptor};

/// Dotted property key to string value
pub type PropertyMap = BTreeMap<String, String>;

pub const PROJECT_BASEDIR: &str = "sonar.projectBaseDir";
pub const PROJECT_SOURCE_DIRS: &str = "sonar.sources";
pub const PROJECT_TEST_DIRS: &str = "sonar.tests";
pub const COVERAGE_EXCLUSIONS: &str = "sonar.coverage.exclusions";
pub const SCAN_ALL_SOURCES: &str = "sonar.maven.scanAll";
pub const JAVA_LIBRARIES: &str = "sonar.java.libraries";
pub const JAVA_BINARIES: &str = "sonar.java.binaries";
pub const HOST_URL: &str = "sonar.host.url";
pub const VERBOSE: &str = "sonar.verbose";

// Singular and plural forms, case-insensitive, with an optional dot before `path`.
const REPORT_PROPERTY_PATTERN: &str = r"(?i)^sonar\..*report\.?paths?$";

/// True when `key` names an analysis report artifact property
/// (`sonar.jacoco.reportPath`, `sonar.junit.reportPaths`, `sonar.report.paths`)
pub fn is_report_property(key: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(REPORT_PROPERTY_PATTERN).expect("report pattern is valid"))
        .is_match(key)
}

/// True when `key` is a top-level or module-scoped source or test dirs key
pub fn is_source_or_test_dirs(key: &str) -> bool {
    key.ends_with(PROJECT_SOURCE_DIRS) || key.ends_with(PROJECT_TEST_DIRS)
}

/// Parses a boolean property the lenient way: only `true` (any case) is true
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
