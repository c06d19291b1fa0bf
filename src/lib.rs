//! scanbridge - bridge from a build tool's project model to an analysis
//! engine's property set
//!
//! The library takes a snapshot of the build's modules and declared
//! properties, overlays user overrides and decrypted secrets, and can crawl
//! the project tree for sources the build never declared. Discovered files
//! are appended to `sonar.sources` and kept out of coverage.
//!
//! # Example Usage
//!
//! ```no_run
//! use scanbridge::{NoopDecryptor, PropertyMap, PropertyReconciler, ProjectSnapshot};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), scanbridge::BridgeError> {
//! let snapshot = ProjectSnapshot::from_file(Path::new("project.yaml"))?;
//! let overrides = PropertyMap::new();
//! let result = PropertyReconciler::collect_properties(&snapshot, &overrides, &NoopDecryptor)?;
//! println!("{:?}", result.properties.get("sonar.sources"));
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`reconcile`]: effective property set construction
//! - [`discovery`]: tree walk, path helpers and coverage exclusions
//! - [`properties`]: property keys, CSV codec and decryption seam
//! - [`version`]: server version ordering and gate
//! - [`bootstrap`]: one end-to-end run against an [`engine::AnalysisEngine`]

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod project;
pub mod properties;
pub mod reconcile;
pub mod util;
pub mod version;

pub use bootstrap::Bootstrapper;
pub use config::{BridgeConfig, ConfigError};
pub use discovery::{SourceWalker, WalkOutcome};
pub use engine::{AnalysisEngine, DryRunEngine};
pub use error::{BridgeError, BridgeResult};
pub use project::{ModuleSnapshot, ProjectSnapshot};
pub use properties::{NoopDecryptor, PropertyDecryptor, PropertyMap, StaticDecryptor};
pub use reconcile::{DiscoveryStatus, PropertyReconciler, Reconciliation};
pub use util::{init_logging, LoggingConfig};
pub use version::{Version, VersionGate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_scanbridge() {
        assert_eq!(NAME, "scanbridge");
    }
}
