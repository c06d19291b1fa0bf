//! Source discovery walk
//!
//! One pre-order pass over the project tree. Directories in the skip set,
//! declared source directories and hidden directories are pruned before
//! descent; every regular file left is checked against the declared sources,
//! the report artifacts and the extension allow-list.

use super::paths;
use super::patterns::{is_excluded_dir, is_interesting_file};
use crate::error::{BridgeError, BridgeResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Files found by a walk, in visitation order, plus the error that stopped
/// it early, if any
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub sources: Vec<PathBuf>,
    pub error: Option<BridgeError>,
}

#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,
    existing_sources: HashSet<PathBuf>,
    skipped_dirs: HashSet<PathBuf>,
    excluded_files: HashSet<PathBuf>,
    include_binary_languages: bool,
}

impl SourceWalker {
    /// `root` must be absolute; it is normalized lexically
    pub fn new(root: &Path) -> Self {
        Self {
            root: paths::normalize(root),
            existing_sources: HashSet::new(),
            skipped_dirs: HashSet::new(),
            excluded_files: HashSet::new(),
            include_binary_languages: false,
        }
    }

    /// Files and directories already covered by declared source/test dirs
    pub fn with_existing_sources<I: IntoIterator<Item = PathBuf>>(mut self, sources: I) -> Self {
        self.existing_sources = normalized(sources);
        self
    }

    /// Directories never descended into
    pub fn with_skipped_dirs<I: IntoIterator<Item = PathBuf>>(mut self, dirs: I) -> Self {
        self.skipped_dirs = normalized(dirs);
        self
    }

    /// Report artifacts that must not be mistaken for sources
    pub fn with_excluded_files<I: IntoIterator<Item = PathBuf>>(mut self, files: I) -> Self {
        self.excluded_files = normalized(files);
        self
    }

    pub fn include_binary_languages(mut self, include: bool) -> Self {
        self.include_binary_languages = include;
        self
    }

    /// Lazily walks the tree. Yields accepted files as absolute normalized
    /// paths; walk failures are yielded as `Err` and do not end the iterator.
    pub fn walk(&self) -> impl Iterator<Item = BridgeResult<PathBuf>> + '_ {
        let mut seen = HashSet::new();
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| self.should_enter(entry))
            .filter_map(move |entry| match entry {
                Err(err) => Some(Err(BridgeError::from(err))),
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    let path = paths::normalize(entry.path());
                    (self.accepts(&path) && seen.insert(path.clone())).then_some(Ok(path))
                }
            })
    }

    /// Runs the walk to completion or to the first failure, keeping whatever
    /// was found before it
    pub fn collect(&self) -> WalkOutcome {
        let start = Instant::now();
        info!(
            root = %self.root.display(),
            skipped_dirs = self.skipped_dirs.len(),
            existing_sources = self.existing_sources.len(),
            include_binary_languages = self.include_binary_languages,
            "Starting source discovery"
        );

        let mut outcome = WalkOutcome::default();
        for item in self.walk() {
            match item {
                Ok(path) => {
                    debug!(path = %path.display(), "Discovered source");
                    outcome.sources.push(path);
                }
                Err(err) => {
                    outcome.error = Some(err);
                    break;
                }
            }
        }

        info!(
            discovered = outcome.sources.len(),
            complete = outcome.error.is_none(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Source discovery finished"
        );
        outcome
    }

    fn should_enter(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        let path = paths::normalize(entry.path());
        if self.skipped_dirs.contains(&path) || self.existing_sources.contains(&path) {
            debug!(dir = %path.display(), "Pruning skipped directory");
            return false;
        }
        entry.depth() == 0 || !is_excluded_dir(&path)
    }

    fn accepts(&self, path: &Path) -> bool {
        // Property values are UTF-8; such a path could never be matched back
        if path.to_str().is_none() {
            debug!(path = %path.display(), "Skipping non UTF-8 path");
            return false;
        }
        !self.existing_sources.contains(path)
            && !self.excluded_files.contains(path)
            && is_interesting_file(path, self.include_binary_languages)
    }
}

fn normalized<I: IntoIterator<Item = PathBuf>>(items: I) -> HashSet<PathBuf> {
    items.into_iter().map(|p| paths::normalize(&p)).collect()
}
