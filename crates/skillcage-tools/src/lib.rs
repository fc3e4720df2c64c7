//! Skillcage Tools
//!
//! Agent-facing adapters over a [`skillcage_skills::SkillsRegistry`]:
//!
//! - `activate_skill` returns a skill's full SKILL.md instructions
//! - `load_skill_file` reads a reference file from inside a skill
//! - `run_skill_script` runs a bundled script after explicit user approval
//!
//! Results use the tagged [`skillcage_types::ToolOutcome`] shape. Script runs
//! always go through an [`ApprovalGate`], even in otherwise unattended sessions.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod approval;
pub mod command;
pub mod definitions;
pub mod error;
pub mod toolbox;

pub use approval::{ApprovalGate, DenyAll, ScriptApproval};
pub use command::{
    SkillCommand, ACTIVATE_SKILL_TOOL, LOAD_SKILL_FILE_TOOL, RUN_SKILL_SCRIPT_TOOL, TOOL_NAMES,
};
pub use error::{Result, ToolError};
pub use toolbox::SkillToolbox;
