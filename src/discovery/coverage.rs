//! Coverage exclusions for automatically collected sources
//!
//! Collected files were never curated as analyzable sources, so they are
//! excluded from coverage: the engine only accepts patterns relative to the
//! project base directory.

use super::paths;
use crate::error::{BridgeError, BridgeResult};
use crate::properties::csv;
use std::path::{Path, PathBuf};

/// Appends `discovered` (relativized against `base_dir`) to the original
/// exclusion list. Original entries keep their order and come first.
pub fn compute(
    base_dir: &Path,
    original_exclusions: Option<&str>,
    discovered: &[PathBuf],
) -> BridgeResult<String> {
    let mut exclusions = csv::split(original_exclusions);
    for path in discovered {
        let relative =
            paths::relativize(base_dir, path).ok_or_else(|| BridgeError::PathOutsideBase {
                path: path.clone(),
                base: base_dir.to_path_buf(),
            })?;
        exclusions.push(relative);
    }
    Ok(csv::join(&exclusions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_preserves_order() {
        let merged = compute(
            Path::new("/proj"),
            Some("a,b"),
            &[
                PathBuf::from("/proj/extra/Util.java"),
                PathBuf::from("/proj/web/app.js"),
            ],
        )
        .unwrap();
        assert_eq!(merged, "a,b,extra/Util.java,web/app.js");
    }

    #[test]
    fn test_compute_with_empty_original() {
        let merged = compute(
            Path::new("/proj"),
            Some(""),
            &[PathBuf::from("/proj/extra/Util.java")],
        )
        .unwrap();
        assert_eq!(merged, "extra/Util.java");
    }

    #[test]
    fn test_compute_drops_blank_original_entries() {
        let merged = compute(Path::new("/proj"), Some(" **/gen/** , ,"), &[]).unwrap();
        assert_eq!(merged, "**/gen/**");
    }

    #[test]
    fn test_compute_absent_original_and_nothing_discovered() {
        assert_eq!(compute(Path::new("/proj"), None, &[]).unwrap(), "");
    }

    #[test]
    fn test_compute_rejects_path_outside_base() {
        let err = compute(
            Path::new("/proj"),
            Some("a"),
            &[PathBuf::from("/elsewhere/Util.java")],
        )
        .unwrap_err();
        match err {
            BridgeError::PathOutsideBase { path, base } => {
                assert_eq!(path, PathBuf::from("/elsewhere/Util.java"));
                assert_eq!(base, PathBuf::from("/proj"));
            }
            other => panic!("Expected PathOutsideBase, got {other:?}"),
        }
    }
}
