//! Effective property set construction
//!
//! Declared properties are overlaid with user overrides and decrypted
//! secrets. When `sonar.maven.scanAll` is on and the user did not pin the
//! source layout, the project tree is crawled for undeclared sources, which
//! are appended to `sonar.sources` and excluded from coverage.

use crate::discovery::{coverage, paths, SourceWalker};
use crate::error::BridgeResult;
use crate::project::ProjectSnapshot;
use crate::properties::{
    self, csv, is_report_property, is_source_or_test_dirs, PropertyDecryptor, PropertyMap,
};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What the discovery pass did during one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStatus {
    Disabled,
    /// The user pinned this property, so the layout is left alone
    SkippedOverride { property: &'static str },
    /// Sources were merged. `warnings` lists failures that cut the pass short.
    Collected {
        discovered: usize,
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub properties: PropertyMap,
    pub discovery: DiscoveryStatus,
}

/// True unless the user set `sonar.maven.scanAll` to something other than `true`
pub fn discovery_enabled(user_overrides: &PropertyMap) -> bool {
    user_overrides
        .get(properties::SCAN_ALL_SOURCES)
        .map_or(true, |value| properties::parse_bool(value))
}

/// Java and Kotlin files can only be analyzed with compiled output; collect
/// them only when the user supplied both binaries and libraries.
pub fn include_binary_languages(user_overrides: &PropertyMap) -> bool {
    user_overrides.contains_key(properties::JAVA_LIBRARIES)
        && user_overrides.contains_key(properties::JAVA_BINARIES)
}

fn skipped_because_of(property: &str) -> String {
    format!(
        "Parameter {} is enabled but the scanner will not collect additional sources because {} has been overridden.",
        properties::SCAN_ALL_SOURCES,
        property
    )
}

pub struct PropertyReconciler<'a> {
    decryptor: &'a dyn PropertyDecryptor,
    skipped_dirs: Vec<PathBuf>,
}

impl<'a> PropertyReconciler<'a> {
    pub fn new(decryptor: &'a dyn PropertyDecryptor) -> Self {
        Self {
            decryptor,
            skipped_dirs: Vec::new(),
        }
    }

    pub fn with_skipped_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.skipped_dirs = dirs;
        self
    }

    /// Resolves the top-level module and reconciles the snapshot's declared
    /// properties with `user_overrides`. A user `sonar.projectBaseDir` moves
    /// the walk root too.
    pub fn collect_properties(
        snapshot: &ProjectSnapshot,
        user_overrides: &PropertyMap,
        decryptor: &'a dyn PropertyDecryptor,
    ) -> BridgeResult<Reconciliation> {
        let base_dir = snapshot.base_dir(user_overrides)?;
        let reconciler = PropertyReconciler::new(decryptor)
            .with_skipped_dirs(snapshot.skipped_dirs.clone());
        Ok(reconciler.reconcile_detailed(
            &snapshot.declared,
            user_overrides,
            discovery_enabled(user_overrides),
            &base_dir,
        ))
    }

    pub fn reconcile(
        &self,
        declared: &PropertyMap,
        user_overrides: &PropertyMap,
        discovery_enabled: bool,
        project_base_dir: &Path,
    ) -> PropertyMap {
        self.reconcile_detailed(declared, user_overrides, discovery_enabled, project_base_dir)
            .properties
    }

    pub fn reconcile_detailed(
        &self,
        declared: &PropertyMap,
        user_overrides: &PropertyMap,
        discovery_enabled: bool,
        project_base_dir: &Path,
    ) -> Reconciliation {
        let mut props = declared.clone();
        props.extend(user_overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        let decrypted = self.decryptor.decrypt_properties(&props);
        props.extend(decrypted);

        if !discovery_enabled {
            return Reconciliation {
                properties: props,
                discovery: DiscoveryStatus::Disabled,
            };
        }

        info!(
            "Parameter {} is enabled. The scanner will attempt to collect additional sources.",
            properties::SCAN_ALL_SOURCES
        );

        for property in [properties::PROJECT_SOURCE_DIRS, properties::PROJECT_TEST_DIRS] {
            if user_overrides.contains_key(property) {
                warn!("{}", skipped_because_of(property));
                return Reconciliation {
                    properties: props,
                    discovery: DiscoveryStatus::SkippedOverride { property },
                };
            }
        }

        let discovery = self.collect_all_sources(
            &mut props,
            project_base_dir,
            include_binary_languages(user_overrides),
        );
        Reconciliation {
            properties: props,
            discovery,
        }
    }

    /// Crawls `base_dir` and merges what it finds into `sonar.sources` and
    /// `sonar.coverage.exclusions`. Failures are logged and reported in the
    /// returned status, never propagated.
    pub fn collect_all_sources(
        &self,
        props: &mut PropertyMap,
        base_dir: &Path,
        include_binaries: bool,
    ) -> DiscoveryStatus {
        let mut warnings = Vec::new();

        let base_dir = if base_dir.is_absolute() {
            paths::normalize(base_dir)
        } else {
            match env::current_dir() {
                Ok(cwd) => paths::absolutize(&cwd, base_dir),
                Err(err) => {
                    warn!(error = %err, "Cannot resolve project base directory");
                    warnings.push(err.to_string());
                    return DiscoveryStatus::Collected {
                        discovered: 0,
                        warnings,
                    };
                }
            }
        };

        let walker = SourceWalker::new(&base_dir)
            .with_existing_sources(covered_sources(props, &base_dir))
            .with_skipped_dirs(
                self.skipped_dirs
                    .iter()
                    .map(|dir| paths::absolutize(&base_dir, dir)),
            )
            .with_excluded_files(excluded_report_files(props, &base_dir))
            .include_binary_languages(include_binaries);

        let outcome = walker.collect();
        if let Some(err) = &outcome.error {
            warn!(error = %err, "Source discovery stopped early, keeping partial results");
            warnings.push(err.to_string());
        }

        let mut merged = csv::split(props.get(properties::PROJECT_SOURCE_DIRS).map(String::as_str));
        merged.extend(
            outcome
                .sources
                .iter()
                .filter_map(|p| p.to_str().map(str::to_string)),
        );
        props.insert(properties::PROJECT_SOURCE_DIRS.to_string(), csv::join(&merged));

        match coverage::compute(
            &base_dir,
            props.get(properties::COVERAGE_EXCLUSIONS).map(String::as_str),
            &outcome.sources,
        ) {
            Ok(exclusions) => {
                props.insert(properties::COVERAGE_EXCLUSIONS.to_string(), exclusions);
            }
            Err(err) => {
                warn!(error = %err, "Failed to exclude collected sources from coverage");
                warnings.push(err.to_string());
            }
        }

        DiscoveryStatus::Collected {
            discovered: outcome.sources.len(),
            warnings,
        }
    }
}

/// Every entry of every `*sonar.sources` / `*sonar.tests` value, top-level and
/// per module
fn covered_sources(props: &PropertyMap, base_dir: &Path) -> HashSet<PathBuf> {
    props
        .iter()
        .filter(|(key, value)| is_source_or_test_dirs(key) && !value.is_empty())
        .flat_map(|(_, value)| csv::split(Some(value)))
        .map(|entry| paths::absolutize(base_dir, Path::new(&entry)))
        .collect()
}

fn excluded_report_files(props: &PropertyMap, base_dir: &Path) -> HashSet<PathBuf> {
    props
        .iter()
        .filter(|(key, _)| is_report_property(key))
        .flat_map(|(_, value)| csv::split(Some(value)))
        .map(|entry| paths::absolutize(base_dir, Path::new(&entry)))
        .collect()
}
