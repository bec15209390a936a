// Export discovery utilities - some reserved for future use
#![allow(dead_code)]

use crate::config::Config;
use ignore::WalkBuilder;
use miette::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// File name suffix of SSA export files produced by the front-end.
pub const EXPORT_SUFFIX: &str = ".ssa.json";

/// Whether a path names an SSA export file.
pub fn is_export(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(EXPORT_SUFFIX))
        .unwrap_or(false)
}

/// Finder for SSA export files under the configured targets.
pub struct ExportFinder<'a> {
    config: &'a Config,
}

impl<'a> ExportFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all SSA exports under the given root. Targets from the
    /// config are resolved relative to the root; without targets the
    /// root itself is scanned. A target naming a single export file is
    /// accepted as-is.
    pub fn find_exports(&self, root: &Path) -> Result<Vec<PathBuf>> {
        debug!("Scanning for SSA exports in: {}", root.display());

        let targets = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config.targets.iter().map(|t| root.join(t)).collect()
        };

        let mut files: Vec<PathBuf> = targets
            .par_iter()
            .flat_map(|target| self.scan_target(target))
            .collect();

        // Stable input order keeps progress output reproducible.
        files.sort();
        debug!("Found {} SSA exports", files.len());
        Ok(files)
    }

    /// Scan one target path. Directories are walked with ignore rules
    /// applied; a file target passes straight through the same filters.
    fn scan_target(&self, target: &Path) -> Vec<PathBuf> {
        if !target.exists() {
            trace!("Target does not exist: {}", target.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(target)
            .hidden(true)           // Skip hidden files
            .git_ignore(true)       // Respect .gitignore
            .git_global(true)       // Respect global gitignore
            .git_exclude(true)      // Respect .git/info/exclude
            .ignore(true)           // Respect .ignore files
            .parents(true)          // Check parent directories for ignore files
            .follow_links(false)    // Don't follow symlinks
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();

                if self.config.should_exclude(path) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                if !is_export(path) {
                    return None;
                }

                trace!("Found export: {}", path.display());
                Some(path.to_path_buf())
            })
            .collect()
    }
}
