//! Lexical path normalization
//!
//! Paths coming from properties are compared against paths produced by the
//! walker, so both sides go through the same normalization. Nothing here
//! touches the filesystem: symlinks are not resolved.

use std::path::{Component, Path, PathBuf};

/// Removes `.` components and folds `..` into the preceding component.
/// A `..` at the root is dropped, a leading `..` on a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves `path` against `base` when relative, then normalizes
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// `path` relative to `base` with `/` separators, or `None` when `path` is
/// not under `base`
pub fn relativize(base: &Path, path: &Path) -> Option<String> {
    let rel = normalize(path).strip_prefix(normalize(base)).ok()?.to_path_buf();
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
