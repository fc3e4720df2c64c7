//! Skills registry for managing multiple skills
//!
//! Implements progressive disclosure architecture:
//! - Discovery: scan search roots and load each bundle's manifest header
//! - Activation: hand the full manifest to the agent on demand
//!
//! Discovery builds a fresh map and swaps it in whole, so readers see either
//! the previous snapshot or the new one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::filter::SkipFilter;
use crate::manifest::MANIFEST_FILE;
use crate::paths;
use crate::search::SearchSpec;
use crate::skill::Skill;

type SkillMap = HashMap<String, Arc<Skill>>;

/// What a [`SkillWarning`] is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A candidate or root could not be loaded and was left out
    Skipped,
    /// A skill replaced an earlier one with the same name
    Overridden,
}

/// A candidate or root that discovery skipped or overrode, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillWarning {
    /// Offending directory
    pub path: PathBuf,
    /// Kind of problem
    pub kind: WarningKind,
    /// Human-readable reason
    pub reason: String,
}

impl SkillWarning {
    fn skipped(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            path,
            kind: WarningKind::Skipped,
            reason: reason.into(),
        }
    }
}

/// Outcome of one discovery pass
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Names registered by this pass, in discovery order (overrides included)
    pub loaded: Vec<String>,
    /// Skipped candidates and name overrides
    pub warnings: Vec<SkillWarning>,
}

impl DiscoveryReport {
    /// Number of candidates or roots that were left out
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(WarningKind::Skipped)
    }

    /// Number of skills that replaced an earlier one with the same name
    #[must_use]
    pub fn overridden(&self) -> usize {
        self.count(WarningKind::Overridden)
    }

    fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// Skills registry managing all available skills
pub struct SkillsRegistry {
    /// Current snapshot; replaced whole by `discover`
    skills: RwLock<Arc<SkillMap>>,
    /// Serializes discovery passes
    rebuild: Mutex<()>,
    /// Host-supplied ignore rules; any match prunes
    skip: Vec<Box<dyn SkipFilter>>,
}

impl SkillsRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            skills: RwLock::new(Arc::new(HashMap::new())),
            rebuild: Mutex::new(()),
            skip: Vec::new(),
        }
    }

    /// Add `filter` to the rules that prune directories during discovery
    #[must_use]
    pub fn with_skip_filter(mut self, filter: impl SkipFilter + 'static) -> Self {
        self.skip.push(Box::new(filter));
        self
    }

    /// Scan all search roots and replace the registry contents.
    ///
    /// Roots are processed in order and each root's directories in file-name
    /// order; when two skills share a name the later one wins. A bundle that
    /// fails to load is reported in the returned warnings and skipped.
    pub fn discover(&self, specs: &[SearchSpec]) -> DiscoveryReport {
        let _guard = self.rebuild.lock().unwrap_or_else(PoisonError::into_inner);

        info!("Starting skills discovery in {} directories", specs.len());

        let mut skills = SkillMap::new();
        let mut report = DiscoveryReport::default();

        for spec in specs {
            let root = match paths::absolutize(&spec.path) {
                Ok(root) => root,
                Err(e) => {
                    report.warnings.push(SkillWarning::skipped(
                        spec.path.clone(),
                        format!("cannot resolve search root: {e}"),
                    ));
                    continue;
                }
            };

            if !root.exists() {
                debug!("Skills directory does not exist: {:?}", root);
                continue;
            }

            if !root.is_dir() {
                warn!("Skills path is not a directory: {:?}", root);
                report
                    .warnings
                    .push(SkillWarning::skipped(root, "search root is not a directory"));
                continue;
            }

            self.scan_directory(&root, spec.max_depth(), &mut skills, &mut report);
        }

        info!(
            "Discovered {} skills ({} skipped, {} overridden)",
            skills.len(),
            report.skipped(),
            report.overridden()
        );

        *self.skills.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(skills);
        report
    }

    /// Walk one search root and load every candidate bundle
    fn scan_directory(
        &self,
        root: &Path,
        max_depth: usize,
        skills: &mut SkillMap,
        report: &mut DiscoveryReport,
    ) {
        info!("Scanning skills directory {:?} (depth {})", root, max_depth);

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || (!is_hidden(entry) && !self.is_skipped(root, entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if !path.join(MANIFEST_FILE).is_file() {
                continue;
            }

            match Skill::load(path) {
                Ok(skill) => {
                    let name = skill.name().to_string();
                    debug!("Discovered skill: {} at {:?}", name, path);
                    if let Some(previous) = skills.insert(name.clone(), Arc::new(skill)) {
                        warn!(
                            "Skill '{}' at {:?} overrides {:?}",
                            name,
                            path,
                            previous.root_path()
                        );
                        report.warnings.push(SkillWarning {
                            path: path.to_path_buf(),
                            kind: WarningKind::Overridden,
                            reason: format!(
                                "skill '{name}' overrides skill at {}",
                                previous.root_path().display()
                            ),
                        });
                    }
                    report.loaded.push(name);
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    report
                        .warnings
                        .push(SkillWarning::skipped(path.to_path_buf(), e.to_string()));
                }
            }
        }
    }

    /// Whether a host filter prunes `path`, judged relative to `root`
    fn is_skipped(&self, root: &Path, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        self.skip.iter().any(|filter| filter.should_skip(root, relative))
    }

    /// Current snapshot of all skills
    fn snapshot(&self) -> Arc<SkillMap> {
        Arc::clone(&self.skills.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Get a skill by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Skill>> {
        self.snapshot().get(name).cloned()
    }

    /// Get all skill names, sorted
    #[must_use]
    pub fn skill_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// All skills, sorted by name
    #[must_use]
    pub fn skills(&self) -> Vec<Arc<Skill>> {
        let mut skills: Vec<Arc<Skill>> = self.snapshot().values().cloned().collect();
        skills.sort_by(|a, b| a.name().cmp(b.name()));
        skills
    }

    /// Get number of skills
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Generate skills list for LLM system prompt
    /// Format:
    /// Available skills (call activate_skill with the skill name to load its instructions):
    /// - skill-name: Description of what this skill does and when to use it
    /// - another-skill: Another description...
    #[must_use]
    pub fn generate_system_prompt(&self) -> String {
        let skills = self.skills();
        if skills.is_empty() {
            return String::new();
        }

        let mut prompt = String::from(
            "\n\nAvailable skills (call activate_skill with the skill name to load its instructions):\n",
        );

        for skill in skills {
            prompt.push_str(&skill.to_summary());
            prompt.push('\n');
        }

        prompt
    }

    /// Generate a concise skills list for embedding in tool descriptions
    #[must_use]
    pub fn generate_skills_list(&self) -> String {
        let skills = self.skills();
        if skills.is_empty() {
            return "No skills available".to_string();
        }

        skills
            .iter()
            .map(|skill| format!("{}: {}", skill.name(), skill.description()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SkillsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SkillsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillsRegistry")
            .field("skills", &self.skill_names())
            .finish_non_exhaustive()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
