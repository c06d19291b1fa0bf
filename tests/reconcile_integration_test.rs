//! End-to-end reconciliation over a real project tree

use scanbridge::discovery::paths;
use scanbridge::properties::{self, csv};
use scanbridge::{
    Bootstrapper, DiscoveryStatus, DryRunEngine, ModuleSnapshot, NoopDecryptor, ProjectSnapshot,
    PropertyMap, PropertyReconciler, SourceWalker, StaticDecryptor,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(base: &Path, rel: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "content").unwrap();
}

fn map(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Two-module build: `src/` is declared at the top level, `moduleB/` is a
/// child module whose directory the build host marks as skipped.
fn project(root: &Path) -> ProjectSnapshot {
    write(root, "src/Main.java");
    write(root, "extra/Util.java");
    write(root, "target/report.xml");
    write(root, "moduleB/src/B.java");
    write(root, "moduleB/web/b.js");

    ProjectSnapshot {
        modules: vec![
            ModuleSnapshot {
                key: "org.acme:parent".to_string(),
                base_dir: root.to_path_buf(),
                execution_root: true,
                properties: PropertyMap::new(),
            },
            ModuleSnapshot {
                key: "org.acme:moduleB".to_string(),
                base_dir: root.join("moduleB"),
                execution_root: false,
                properties: PropertyMap::new(),
            },
        ],
        declared: map(&[
            ("sonar.projectKey", "org.acme:parent"),
            ("sonar.sources", "src"),
            ("org.acme:moduleB.sonar.sources", "moduleB/src"),
            ("sonar.report.paths", "target/report.xml"),
        ]),
        skipped_dirs: vec![PathBuf::from("moduleB")],
    }
}

fn binaries_overrides() -> PropertyMap {
    map(&[
        ("sonar.java.libraries", "lib/*.jar"),
        ("sonar.java.binaries", "target/classes"),
    ])
}

#[test]
fn test_discovers_only_undeclared_sources() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());
    let overrides = binaries_overrides();

    let result =
        PropertyReconciler::collect_properties(&snapshot, &overrides, &NoopDecryptor).unwrap();

    assert_eq!(
        result.discovery,
        DiscoveryStatus::Collected {
            discovered: 1,
            warnings: vec![],
        }
    );

    let sources = csv::split(result.properties.get("sonar.sources").map(String::as_str));
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0], "src");
    let discovered = paths::relativize(dir.path(), Path::new(&sources[1]));
    assert_eq!(discovered.as_deref(), Some("extra/Util.java"));

    assert_eq!(result.properties["sonar.coverage.exclusions"], "extra/Util.java");
    assert!(!result.properties["sonar.sources"].contains("report.xml"));
    assert!(!result.properties["sonar.sources"].contains("moduleB"));
}

#[test]
fn test_java_sources_need_binaries_to_be_collected() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());

    let result =
        PropertyReconciler::collect_properties(&snapshot, &PropertyMap::new(), &NoopDecryptor)
            .unwrap();

    assert_eq!(
        result.discovery,
        DiscoveryStatus::Collected {
            discovered: 0,
            warnings: vec![],
        }
    );
    assert_eq!(result.properties["sonar.sources"], "src");
    assert_eq!(result.properties["sonar.coverage.exclusions"], "");
}

#[test]
fn test_source_override_skips_discovery() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());
    let mut overrides = binaries_overrides();
    overrides.insert("sonar.sources".to_string(), "src,extra".to_string());
    overrides.insert("sonar.maven.scanAll".to_string(), "true".to_string());

    let result =
        PropertyReconciler::collect_properties(&snapshot, &overrides, &NoopDecryptor).unwrap();

    assert_eq!(
        result.discovery,
        DiscoveryStatus::SkippedOverride {
            property: properties::PROJECT_SOURCE_DIRS
        }
    );
    assert_eq!(result.properties["sonar.sources"], "src,extra");
    assert!(!result.properties.contains_key("sonar.coverage.exclusions"));
}

#[test]
fn test_scan_all_disabled_leaves_layout_alone() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());
    let mut overrides = binaries_overrides();
    overrides.insert("sonar.maven.scanAll".to_string(), "FALSE".to_string());

    let result =
        PropertyReconciler::collect_properties(&snapshot, &overrides, &NoopDecryptor).unwrap();

    assert_eq!(result.discovery, DiscoveryStatus::Disabled);
    assert_eq!(result.properties["sonar.sources"], "src");
}

#[test]
fn test_decrypted_values_win_over_overrides() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());
    let overrides = map(&[
        ("sonar.maven.scanAll", "false"),
        ("sonar.login", "{encrypted-token}"),
    ]);
    let decryptor = StaticDecryptor::new(map(&[("sonar.login", "clear-token")]));

    let result = PropertyReconciler::collect_properties(&snapshot, &overrides, &decryptor).unwrap();

    assert_eq!(result.properties["sonar.login"], "clear-token");
    assert_eq!(result.properties["sonar.projectKey"], "org.acme:parent");
}

#[test]
fn test_walker_matches_reconciled_discovery() {
    let dir = TempDir::new().unwrap();
    project(dir.path());

    let walked: Vec<PathBuf> = SourceWalker::new(dir.path())
        .with_existing_sources([dir.path().join("src")])
        .with_skipped_dirs([dir.path().join("moduleB")])
        .with_excluded_files([dir.path().join("target/report.xml")])
        .include_binary_languages(true)
        .walk()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(walked, vec![dir.path().join("extra/Util.java")]);
}

#[test]
fn test_bootstrap_run_hands_discovered_sources_to_engine() {
    let dir = TempDir::new().unwrap();
    let snapshot = project(dir.path());
    let overrides = binaries_overrides();
    let mut engine = DryRunEngine::new(Some("10.4.1.88267".to_string()));

    let reconciliation = Bootstrapper::new(&mut engine, &snapshot, &overrides, &NoopDecryptor)
        .with_verbose(false)
        .execute()
        .unwrap();

    let executed = engine.executed().unwrap();
    assert_eq!(executed["sonar.sources"], reconciliation.properties["sonar.sources"]);
    assert_eq!(executed["sonar.coverage.exclusions"], "extra/Util.java");
}

#[test]
fn test_csv_split_join_is_stable() {
    let samples = [
        "",
        "a",
        " a , b ,,c ",
        ",,,",
        "src/main/java, src/main/resources",
    ];
    for sample in samples {
        let once = csv::join(&csv::split(Some(sample)));
        let twice = csv::join(&csv::split(Some(&once)));
        assert_eq!(once, twice, "unstable for {:?}", sample);
        assert!(csv::split(Some(&once)).iter().all(|e| !e.is_empty()));
    }
}
