//! Error types for manifest parsing, skill loading and confined access

use std::path::PathBuf;
use thiserror::Error;

/// Manifest header errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The document does not open with a `---` fenced header
    #[error("no metadata header found (expected leading '---' fence)")]
    NoMetadata,

    /// The header exists but is not a usable metadata mapping
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),
}

/// Skill construction errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bundle directory has no manifest file
    #[error("SKILL.md not found in {}", .0.display())]
    MissingManifest(PathBuf),

    /// The manifest exists but could not be parsed
    #[error("invalid SKILL.md in {}: {source}", .path.display())]
    Manifest {
        /// Skill directory
        path: PathBuf,
        /// Parse failure
        #[source]
        source: ManifestError,
    },

    /// The manifest could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Errors from file and script access inside a skill
#[derive(Debug, Error)]
pub enum SkillError {
    /// The requested path normalizes to a location outside the skill directory
    #[error("path escapes skill directory: {0}")]
    Confinement(String),

    /// The requested file or script does not exist or is not a regular file
    #[error("file not found in skill: {0}")]
    NotFound(String),

    /// Reading a confined file failed
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path as requested by the caller
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The script could not be started
    #[error("failed to start script '{script}': {source}")]
    Spawn {
        /// Script path as requested by the caller
        script: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The script ran and exited unsuccessfully
    #[error("{message}")]
    ScriptFailure {
        /// Exit description followed by captured stderr
        message: String,
        /// Captured stderr on its own
        stderr: String,
    },

    /// The task watching the script went away before reporting
    #[error("script '{0}' finished without reporting a result")]
    ScriptAborted(String),
}

/// Convenient Result type alias
pub type Result<T, E = SkillError> = std::result::Result<T, E>;
