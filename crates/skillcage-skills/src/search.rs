//! Discovery inputs

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths::expand_home;

/// Depth bound for recursive scans
pub const MAX_RECURSIVE_DEPTH: usize = 99;

/// One discovery root
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "SearchSpecConfig")]
pub struct SearchSpec {
    /// Directory to scan; a leading `~` is expanded
    pub path: PathBuf,
    /// Scan below direct children
    pub recursive: bool,
}

impl SearchSpec {
    /// Scan only the direct children of `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }

    /// Scan `path` up to [`MAX_RECURSIVE_DEPTH`] levels deep
    pub fn recursive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: true,
        }
    }

    /// Maximum walk depth below the root
    #[must_use]
    pub fn max_depth(&self) -> usize {
        if self.recursive {
            MAX_RECURSIVE_DEPTH
        } else {
            1
        }
    }
}

/// Configuration form of a search root
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchSpecConfig {
    /// Simple form: just a path, scanned non-recursively
    Simple(String),

    /// Table form with an explicit recursion flag
    Detailed {
        /// Directory to scan
        path: String,
        /// Scan below direct children
        #[serde(default)]
        recursive: bool,
    },
}

impl From<SearchSpecConfig> for SearchSpec {
    fn from(config: SearchSpecConfig) -> Self {
        match config {
            SearchSpecConfig::Simple(path) => Self::new(expand_home(&path)),
            SearchSpecConfig::Detailed { path, recursive } => Self {
                path: expand_home(&path),
                recursive,
            },
        }
    }
}
