//! User approval for script runs
//!
//! Running a skill script is the one tool call that always needs a human in
//! the loop. The host supplies an [`ApprovalGate`]; the toolbox consults it
//! after the script path has passed confinement and before anything spawns.

use async_trait::async_trait;
use std::path::Path;

use skillcage_skills::script::substitute_placeholder;

/// What the user is asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptApproval {
    /// Skill owning the script
    pub skill_name: String,
    /// Script path relative to the skill directory, as requested
    pub script_path: String,
    /// Arguments with the skill directory placeholder already expanded
    pub args: Vec<String>,
}

impl ScriptApproval {
    /// Build a request, expanding placeholders against `skill_dir`
    #[must_use]
    pub fn new(skill_name: &str, script_path: &str, args: &[String], skill_dir: &Path) -> Self {
        Self {
            skill_name: skill_name.to_string(),
            script_path: script_path.to_string(),
            args: substitute_placeholder(args, skill_dir),
        }
    }

    /// Human-readable summary shown before the run and repeated in its result
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Skill: {}\nScript: {}\nArgs: {}",
            self.skill_name,
            self.script_path,
            join_args(&self.args)
        )
    }
}

/// Join arguments for display, quoting any that would otherwise be ambiguous
fn join_args(args: &[String]) -> String {
    if args.is_empty() {
        return "(none)".to_string();
    }

    args.iter()
        .map(|arg| {
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
                format!("{arg:?}")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Asks the user whether a script may run
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    /// Return true only if the user explicitly approved `request`
    async fn confirm(&self, request: &ScriptApproval) -> bool;
}

/// Refuses every run; the safe default for hosts without an interactive user
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl ApprovalGate for DenyAll {
    async fn confirm(&self, _request: &ScriptApproval) -> bool {
        false
    }
}
