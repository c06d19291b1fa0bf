//! Read-only snapshot of the build tool's project model
//!
//! The build host converts its live module graph into this plain structure
//! once per invocation: one entry per module plus the already-converted
//! declared property map and the directories discovery must not enter.

use crate::error::{BridgeError, BridgeResult};
use crate::properties::{self, PropertyMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    /// Module identifier, e.g. `org.acme:app`
    pub key: String,
    pub base_dir: PathBuf,
    /// True for the module the build was started from
    #[serde(default)]
    pub execution_root: bool,
    /// Raw module properties (used for host detection)
    #[serde(default)]
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Modules in build order
    pub modules: Vec<ModuleSnapshot>,
    /// Properties as converted from the project model, top-level and
    /// module-scoped keys
    #[serde(default)]
    pub declared: PropertyMap,
    /// Directories whose content is already fully declared, or is build output
    #[serde(default)]
    pub skipped_dirs: Vec<PathBuf>,
}

impl ProjectSnapshot {
    /// Loads a snapshot from a JSON or YAML file (chosen by extension,
    /// YAML for anything but `.json`)
    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| BridgeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };
        let snapshot: Self = parsed.map_err(|message| BridgeError::SnapshotParse {
            path: path.to_path_buf(),
            message,
        })?;

        debug!(
            path = %path.display(),
            modules = snapshot.modules.len(),
            declared = snapshot.declared.len(),
            "Loaded project snapshot"
        );
        Ok(snapshot)
    }

    /// The module the build was started from
    pub fn top_level(&self) -> BridgeResult<&ModuleSnapshot> {
        self.modules
            .iter()
            .find(|m| m.execution_root)
            .ok_or(BridgeError::NoTopLevelProject)
    }

    /// Base directory the discovery pass walks: `sonar.projectBaseDir` from
    /// `user_overrides`, then as declared, then the top-level module's
    /// directory
    pub fn base_dir(&self, user_overrides: &PropertyMap) -> BridgeResult<PathBuf> {
        let top = self.top_level()?;
        Ok(user_overrides
            .get(properties::PROJECT_BASEDIR)
            .or_else(|| self.declared.get(properties::PROJECT_BASEDIR))
            .map(PathBuf::from)
            .unwrap_or_else(|| top.base_dir.clone()))
    }

    /// `sonar.host.url` of every module that declares one
    pub fn host_urls(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter_map(|m| m.properties.get(properties::HOST_URL))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module(key: &str, root: bool) -> ModuleSnapshot {
        ModuleSnapshot {
            key: key.to_string(),
            base_dir: PathBuf::from(format!("/proj/{key}")),
            execution_root: root,
            properties: PropertyMap::new(),
        }
    }

    #[test]
    fn test_top_level_is_first_execution_root() {
        let snapshot = ProjectSnapshot {
            modules: vec![module("a", false), module("b", true), module("c", true)],
            ..Default::default()
        };
        assert_eq!(snapshot.top_level().unwrap().key, "b");
    }

    #[test]
    fn test_missing_top_level_is_configuration_error() {
        let snapshot = ProjectSnapshot {
            modules: vec![module("a", false)],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.top_level(),
            Err(BridgeError::NoTopLevelProject)
        ));
    }

    #[test]
    fn test_base_dir_prefers_declared_property() {
        let mut snapshot = ProjectSnapshot {
            modules: vec![module("app", true)],
            ..Default::default()
        };
        let no_overrides = PropertyMap::new();
        assert_eq!(
            snapshot.base_dir(&no_overrides).unwrap(),
            PathBuf::from("/proj/app")
        );

        snapshot
            .declared
            .insert(properties::PROJECT_BASEDIR.to_string(), "/work".to_string());
        assert_eq!(
            snapshot.base_dir(&no_overrides).unwrap(),
            PathBuf::from("/work")
        );
    }

    #[test]
    fn test_base_dir_user_override_wins() {
        let mut snapshot = ProjectSnapshot {
            modules: vec![module("app", true)],
            ..Default::default()
        };
        snapshot
            .declared
            .insert(properties::PROJECT_BASEDIR.to_string(), "/work".to_string());
        let mut overrides = PropertyMap::new();
        overrides.insert(
            properties::PROJECT_BASEDIR.to_string(),
            "/proj/app/sub".to_string(),
        );

        assert_eq!(
            snapshot.base_dir(&overrides).unwrap(),
            PathBuf::from("/proj/app/sub")
        );
    }

    #[test]
    fn test_from_file_yaml_and_json() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("snapshot.yaml");
        std::fs::write(
            &yaml,
            r#"
modules:
  - key: app
    base_dir: /proj
    execution_root: true
    properties:
      sonar.host.url: https://sonarcloud.io
declared:
  sonar.sources: /proj/src
skipped_dirs:
  - /proj/target
"#,
        )
        .unwrap();
        let from_yaml = ProjectSnapshot::from_file(&yaml).unwrap();
        assert_eq!(from_yaml.modules.len(), 1);
        assert_eq!(from_yaml.skipped_dirs, vec![PathBuf::from("/proj/target")]);
        assert_eq!(
            from_yaml.host_urls().collect::<Vec<_>>(),
            vec!["https://sonarcloud.io"]
        );

        let json = dir.path().join("snapshot.json");
        std::fs::write(&json, serde_json::to_string(&from_yaml).unwrap()).unwrap();
        assert_eq!(ProjectSnapshot::from_file(&json).unwrap(), from_yaml);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            ProjectSnapshot::from_file(&bad),
            Err(BridgeError::SnapshotParse { .. })
        ));
        assert!(matches!(
            ProjectSnapshot::from_file(&dir.path().join("missing.yaml")),
            Err(BridgeError::Read { .. })
        ));
    }
}
