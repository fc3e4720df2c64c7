//! Ignore rules for discovery
//!
//! Hidden entries are always pruned by the registry. Anything else the host
//! wants excluded is expressed as a [`SkipFilter`]. Filters see each entry as
//! a path relative to the search root, so directories above the root never
//! influence the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;
use tracing::{debug, warn};

/// Name of the ignore file read by [`GitignoreFilter`]
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Decides whether a directory is pruned from discovery, subtree included
pub trait SkipFilter: Send + Sync {
    /// Return true to skip `relative`, an entry below the search root `root`
    fn should_skip(&self, root: &Path, relative: &Path) -> bool;
}

impl<F> SkipFilter for F
where
    F: Fn(&Path, &Path) -> bool + Send + Sync,
{
    fn should_skip(&self, root: &Path, relative: &Path) -> bool {
        self(root, relative)
    }
}

/// Skips paths whose text matches any of a list of regular expressions.
///
/// The text is the path below the search root with a leading `/` and `/`
/// separators, so `/target(/|$)` matches `target` and `pkg/target/x` but
/// never a `target` directory the root itself lives in.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Compile the given patterns.
    ///
    /// # Errors
    /// Returns the first pattern that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether any patterns are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl SkipFilter for PatternFilter {
    fn should_skip(&self, _root: &Path, relative: &Path) -> bool {
        let text: String = relative
            .components()
            .map(|c| format!("/{}", c.as_os_str().to_string_lossy()))
            .collect();
        self.patterns.iter().any(|re| re.is_match(&text))
    }
}

/// Skips entries matched by `.gitignore` files.
///
/// For each search root the filter reads the `.gitignore` in the root and in
/// every ancestor up to the enclosing repository (the first directory holding
/// `.git`). Deeper files take precedence, and `!` re-includes work as in git.
/// Matchers are built once per root and cached.
#[derive(Default)]
pub struct GitignoreFilter {
    layers: Mutex<HashMap<PathBuf, Arc<Vec<Gitignore>>>>,
}

impl GitignoreFilter {
    /// Create a filter with an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn layers_for(&self, root: &Path) -> Arc<Vec<Gitignore>> {
        let mut cache = self.layers.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(root.to_path_buf())
                .or_insert_with(|| Arc::new(load_layers(root))),
        )
    }
}

impl SkipFilter for GitignoreFilter {
    fn should_skip(&self, root: &Path, relative: &Path) -> bool {
        let path = root.join(relative);
        let is_dir = path.is_dir();

        for layer in self.layers_for(root).iter() {
            let matched = layer.matched_path_or_any_parents(&path, is_dir);
            if matched.is_ignore() {
                return true;
            }
            if matched.is_whitelist() {
                return false;
            }
        }
        false
    }
}

impl std::fmt::Debug for GitignoreFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitignoreFilter").finish_non_exhaustive()
    }
}

/// Matchers for `root` and its ancestors, innermost first
fn load_layers(root: &Path) -> Vec<Gitignore> {
    let mut layers = Vec::new();

    for dir in root.ancestors() {
        let file = dir.join(GITIGNORE_FILE);
        if file.is_file() {
            let mut builder = GitignoreBuilder::new(dir);
            if let Some(e) = builder.add(&file) {
                warn!(path = %file.display(), "Problem reading ignore file: {}", e);
            }
            match builder.build() {
                Ok(gitignore) => {
                    debug!(path = %file.display(), rules = gitignore.num_ignores(), "Loaded ignore file");
                    layers.push(gitignore);
                }
                Err(e) => warn!(path = %file.display(), "Invalid ignore file: {}", e),
            }
        }

        if dir.join(".git").exists() {
            break;
        }
    }

    layers
}
