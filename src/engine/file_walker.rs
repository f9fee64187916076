//! Input file discovery with gitignore support
//!
//! Paths given explicitly are always used. Directories are walked with the
//! `ignore` crate and filtered by include/exclude globs matched against the
//! path relative to the directory being walked.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file discovery
#[derive(Debug, Error)]
pub enum FileWalkerError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),
}

/// Collects input files below a set of roots
#[derive(Debug)]
pub struct FileWalker {
    include_set: Option<GlobSet>,
    exclude_set: GlobSet,
}

impl FileWalker {
    /// Creates a new FileWalker
    ///
    /// # Arguments
    /// * `include` - Include patterns (empty means include all)
    /// * `exclude` - Exclude patterns (applied after include)
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, FileWalkerError> {
        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(include.iter().map(|s| s.as_ref()))?)
        };

        // Always exclude .git directories
        let exclude_set = build_globset(
            exclude
                .iter()
                .map(|s| s.as_ref())
                .chain(std::iter::once("**/.git/**")),
        )?;

        Ok(Self {
            include_set,
            exclude_set,
        })
    }

    /// Discover files under every path, sorted and without duplicates
    ///
    /// # Errors
    ///
    /// Returns `FileWalkerError::NotFound` for a path that does not exist and
    /// `FileWalkerError::Walk` for traversal failures.
    pub fn discover<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PathBuf>, FileWalkerError> {
        let mut files = BTreeSet::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                files.insert(path.to_path_buf());
            } else if path.is_dir() {
                self.walk_dir(path, &mut files)?;
            } else {
                return Err(FileWalkerError::NotFound(path.to_path_buf()));
            }
        }

        Ok(files.into_iter().collect())
    }

    fn walk_dir(&self, root: &Path, files: &mut BTreeSet<PathBuf>) -> Result<(), FileWalkerError> {
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if self.accepts(path.strip_prefix(root).unwrap_or(path)) {
                files.insert(path.to_path_buf());
            } else {
                tracing::trace!(file = %path.display(), "skipped by pattern");
            }
        }
        Ok(())
    }

    /// Whether a path relative to a walk root passes the filters
    pub fn accepts(&self, relative: &Path) -> bool {
        if let Some(ref include_set) = self.include_set
            && !include_set.is_match(relative)
        {
            return false;
        }
        !self.exclude_set.is_match(relative)
    }
}

/// Build a GlobSet from patterns
pub fn build_globset<'a>(
    patterns: impl IntoIterator<Item = &'a str>,
) -> Result<GlobSet, FileWalkerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| FileWalkerError::InvalidGlob {
            pattern: pattern.to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| FileWalkerError::InvalidGlob {
        pattern: "<globset>".to_string(),
        source: e,
    })
}
