//! Output formatting for the effective property set
//!
//! # Example
//!
//! ```
//! use scanbridge::cli::output::{OutputFormat, OutputFormatter};
//! use scanbridge::properties::PropertyMap;
//!
//! let mut props = PropertyMap::new();
//! props.insert("sonar.sources".to_string(), "src".to_string());
//! let formatter = OutputFormatter::new(OutputFormat::Properties);
//! assert_eq!(formatter.format(&props).unwrap(), "sonar.sources=src\n");
//! ```

use anyhow::{Context, Result};

use crate::properties::PropertyMap;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// `key=value` lines, one per property
    Properties,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a property map. Keys come out sorted.
    pub fn format(&self, properties: &PropertyMap) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(properties)
                .context("Failed to serialize properties to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(properties).context("Failed to serialize properties to YAML")
            }
            OutputFormat::Properties => Ok(format_properties(properties)),
        }
    }

    pub fn format_version_check(&self, server: &str, min: &str, supported: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "server_version": server,
                "min_version": min,
                "supported": supported,
            }))
            .context("Failed to serialize version check to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&serde_json::json!({
                "server_version": server,
                "min_version": min,
                "supported": supported,
            }))
            .context("Failed to serialize version check to YAML"),
            OutputFormat::Properties => {
                let (verdict, op) = if supported {
                    ("supported", ">=")
                } else {
                    ("unsupported", "<")
                };
                Ok(format!("{} ({} {} {})\n", verdict, server.trim(), op, min))
            }
        }
    }
}

fn format_properties(properties: &PropertyMap) -> String {
    let mut output = String::new();
    for (key, value) in properties {
        output.push_str(key);
        output.push('=');
        output.push_str(&escape_value(value));
        output.push('\n');
    }
    output
}

fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
