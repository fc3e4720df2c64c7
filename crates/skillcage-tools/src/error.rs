//! Error types for tool dispatch

use skillcage_skills::SkillError;
use thiserror::Error;

/// Tool adapter errors; every variant becomes an error result for the host
#[derive(Debug, Error)]
pub enum ToolError {
    /// The host asked for a tool this crate does not provide
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's parameter schema
    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// What was wrong
        reason: String,
    },

    /// No skill with this name is registered
    #[error("Skill '{0}' not found")]
    SkillNotFound(String),

    /// File access inside the skill failed
    #[error(transparent)]
    Skill(#[from] SkillError),

    /// The user declined the script run
    #[error("Script execution denied by user\n{0}")]
    Denied(String),

    /// The script could not be started or did not succeed
    #[error("{summary}\n\n{source}")]
    Script {
        /// Skill, script and argument summary
        summary: String,
        /// Underlying failure
        #[source]
        source: SkillError,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ToolError>;
