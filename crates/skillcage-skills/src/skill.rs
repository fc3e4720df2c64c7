//! Skill definition and confined access
//!
//! Each skill is a folder containing SKILL.md with YAML frontmatter, plus any
//! reference files and scripts. Every file or script access goes through
//! [`Skill::resolve`], which refuses paths that leave the folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LoadError, Result, SkillError};
use crate::manifest::{parse_manifest, SkillMetadata, MANIFEST_FILE};
use crate::paths;
use crate::script::{self, ScriptHandle};

/// A loaded skill bundle. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Skill {
    root_path: PathBuf,
    metadata: SkillMetadata,
}

impl Skill {
    /// Load a skill from its directory.
    ///
    /// # Errors
    /// Returns a [`LoadError`] if the manifest is missing, unreadable, or invalid.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let root_path = paths::absolutize(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let manifest_path = root_path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(LoadError::MissingManifest(root_path));
        }

        let content = fs::read(&manifest_path).map_err(|source| LoadError::Io {
            path: manifest_path.clone(),
            source,
        })?;

        let metadata = parse_manifest(&content).map_err(|source| LoadError::Manifest {
            path: root_path.clone(),
            source,
        })?;

        Ok(Self {
            root_path,
            metadata,
        })
    }

    /// Get the skill name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get the skill description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Absolute, normalized skill directory
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Parsed manifest header
    #[must_use]
    pub fn metadata(&self) -> &SkillMetadata {
        &self.metadata
    }

    /// Generate a concise summary for LLM system prompt
    /// Format: "- {name}: {description}"
    #[must_use]
    pub fn to_summary(&self) -> String {
        format!("- {}: {}", self.metadata.name, self.metadata.description)
    }

    /// Resolve a path relative to the skill directory.
    ///
    /// # Errors
    /// [`SkillError::Confinement`] if the normalized path is not the skill
    /// directory or one of its descendants.
    pub fn resolve(&self, relative_path: impl AsRef<Path>) -> Result<PathBuf> {
        let relative_path = relative_path.as_ref();
        paths::resolve_within(&self.root_path, relative_path).ok_or_else(|| {
            debug!(
                skill = %self.name(),
                path = %relative_path.display(),
                "Rejected path outside skill directory"
            );
            SkillError::Confinement(relative_path.display().to_string())
        })
    }

    /// Resolve a path that must name an existing regular file.
    ///
    /// # Errors
    /// [`SkillError::Confinement`] as for [`Skill::resolve`], then
    /// [`SkillError::NotFound`] when nothing regular exists there.
    pub fn resolve_file(&self, relative_path: impl AsRef<Path>) -> Result<PathBuf> {
        let relative_path = relative_path.as_ref();
        let full = self.resolve(relative_path)?;
        if full.is_file() {
            Ok(full)
        } else {
            Err(SkillError::NotFound(relative_path.display().to_string()))
        }
    }

    /// Read a file inside the skill directory.
    ///
    /// # Errors
    /// [`SkillError::Confinement`] for escaping paths, [`SkillError::NotFound`]
    /// when the target is missing or not a regular file.
    pub fn read_file(&self, relative_path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let relative_path = relative_path.as_ref();
        let full = self.resolve_file(relative_path)?;

        fs::read(&full).map_err(|source| SkillError::Io {
            path: relative_path.display().to_string(),
            source,
        })
    }

    /// Read the whole raw manifest, header and instructions included.
    ///
    /// # Errors
    /// Same as [`Skill::read_file`].
    pub fn read_manifest_content(&self) -> Result<Vec<u8>> {
        self.read_file(MANIFEST_FILE)
    }

    /// Start a script from inside the skill directory.
    ///
    /// Each argument has [`script::SKILL_DIR_PLACEHOLDER`] replaced with the
    /// skill directory. The script runs in the caller's working directory.
    ///
    /// # Errors
    /// Confinement and not-found errors are returned before anything is
    /// spawned; [`SkillError::Spawn`] if the process cannot be started or no
    /// Tokio runtime is running.
    pub fn run_script(
        &self,
        relative_script_path: impl AsRef<Path>,
        args: &[String],
    ) -> Result<ScriptHandle> {
        let relative_script_path = relative_script_path.as_ref();
        let program = self.resolve_file(relative_script_path)?;
        let label = relative_script_path.display().to_string();

        let args = script::substitute_placeholder(args, &self.root_path);
        debug!(skill = %self.name(), script = %label, "Running skill script");

        script::spawn(program, args, &label)
    }
}
