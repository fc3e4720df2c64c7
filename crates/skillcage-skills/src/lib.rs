//! Skillcage Skills
//!
//! Skill bundles with progressive disclosure and path-confined access.
//!
//! ## Features
//!
//! - Progressive disclosure: only names and descriptions are exposed up front,
//!   full SKILL.md content is read on activation
//! - YAML frontmatter metadata with opaque passthrough of extra keys
//! - Multiple search roots, optionally recursive, with hidden-entry and
//!   host-supplied ignore rules, including `.gitignore` files
//! - Every file read and script launch is confined to the skill directory
//! - Scripts run asynchronously and report through an awaitable handle
//!
//! ## Architecture
//!
//! Discovery: scan search roots, load each `SKILL.md` header into a [`Skill`]
//! Activation: return the whole manifest so the agent reads the instructions
//! Execution: read reference files and run scripts through [`Skill::resolve`]

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod error;
pub mod filter;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod script;
pub mod search;
pub mod skill;

pub use error::{LoadError, ManifestError, SkillError};
pub use filter::{GitignoreFilter, PatternFilter, SkipFilter, GITIGNORE_FILE};
pub use manifest::{parse_manifest, SkillMetadata, MANIFEST_FILE};
pub use registry::{DiscoveryReport, SkillWarning, SkillsRegistry, WarningKind};
pub use script::{ScriptHandle, ScriptOutput, SKILL_DIR_PLACEHOLDER};
pub use search::{SearchSpec, MAX_RECURSIVE_DEPTH};
pub use skill::Skill;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{SearchSpec, Skill, SkillError, SkillsRegistry};
}
