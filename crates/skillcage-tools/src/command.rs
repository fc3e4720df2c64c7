//! The closed set of skill tool calls

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Tool that returns a skill's full instructions
pub const ACTIVATE_SKILL_TOOL: &str = "activate_skill";
/// Tool that reads a file from inside a skill
pub const LOAD_SKILL_FILE_TOOL: &str = "load_skill_file";
/// Tool that runs a script from inside a skill, after user approval
pub const RUN_SKILL_SCRIPT_TOOL: &str = "run_skill_script";

/// All tool names, in the order definitions are published
pub const TOOL_NAMES: [&str; 3] = [
    ACTIVATE_SKILL_TOOL,
    LOAD_SKILL_FILE_TOOL,
    RUN_SKILL_SCRIPT_TOOL,
];

/// A parsed skill tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillCommand {
    /// Load a skill's SKILL.md for the agent to follow
    Activate {
        /// Registered skill name
        skill_name: String,
    },
    /// Read a reference file bundled with a skill
    LoadFile {
        /// Registered skill name
        skill_name: String,
        /// Path relative to the skill directory
        file_path: String,
    },
    /// Run a script bundled with a skill
    RunScript {
        /// Registered skill name
        skill_name: String,
        /// Path relative to the skill directory
        script_path: String,
        /// Arguments; the skill directory placeholder is expanded before spawning
        args: Vec<String>,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ActivateArgs {
    skill_name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoadFileArgs {
    skill_name: String,
    file_path: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RunScriptArgs {
    skill_name: String,
    script_path: String,
    #[serde(default)]
    args: Option<Vec<String>>,
}

impl SkillCommand {
    /// Parse a call by tool name and JSON arguments.
    ///
    /// # Errors
    /// [`ToolError::UnknownTool`] for names outside [`TOOL_NAMES`],
    /// [`ToolError::InvalidArguments`] when the arguments do not fit the schema.
    pub fn parse(tool_name: &str, args: Value) -> Result<Self> {
        match tool_name {
            ACTIVATE_SKILL_TOOL => {
                let ActivateArgs { skill_name } = parse_args(tool_name, args)?;
                Ok(Self::Activate { skill_name })
            }
            LOAD_SKILL_FILE_TOOL => {
                let LoadFileArgs {
                    skill_name,
                    file_path,
                } = parse_args(tool_name, args)?;
                Ok(Self::LoadFile {
                    skill_name,
                    file_path,
                })
            }
            RUN_SKILL_SCRIPT_TOOL => {
                let RunScriptArgs {
                    skill_name,
                    script_path,
                    args,
                } = parse_args(tool_name, args)?;
                Ok(Self::RunScript {
                    skill_name,
                    script_path,
                    args: args.unwrap_or_default(),
                })
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// Name of the tool this command belongs to
    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Activate { .. } => ACTIVATE_SKILL_TOOL,
            Self::LoadFile { .. } => LOAD_SKILL_FILE_TOOL,
            Self::RunScript { .. } => RUN_SKILL_SCRIPT_TOOL,
        }
    }

    /// Skill the command targets
    #[must_use]
    pub fn skill_name(&self) -> &str {
        match self {
            Self::Activate { skill_name }
            | Self::LoadFile { skill_name, .. }
            | Self::RunScript { skill_name, .. } => skill_name,
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_each_tool() {
        assert_eq!(
            SkillCommand::parse("activate_skill", json!({"skill_name": "pdf"})).unwrap(),
            SkillCommand::Activate {
                skill_name: "pdf".into()
            }
        );
        assert_eq!(
            SkillCommand::parse(
                "load_skill_file",
                json!({"skill_name": "pdf", "file_path": "forms.md"})
            )
            .unwrap(),
            SkillCommand::LoadFile {
                skill_name: "pdf".into(),
                file_path: "forms.md".into()
            }
        );
        let run = SkillCommand::parse(
            "run_skill_script",
            json!({"skill_name": "pdf", "script_path": "scripts/fill.py", "args": ["a", "b"]}),
        )
        .unwrap();
        assert_eq!(run.tool_name(), RUN_SKILL_SCRIPT_TOOL);
        assert_eq!(run.skill_name(), "pdf");
    }

    #[test]
    fn test_args_optional() {
        for args in [
            json!({"skill_name": "pdf", "script_path": "s.sh"}),
            json!({"skill_name": "pdf", "script_path": "s.sh", "args": null}),
        ] {
            match SkillCommand::parse("run_skill_script", args).unwrap() {
                SkillCommand::RunScript { args, .. } => assert!(args.is_empty()),
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let err = SkillCommand::parse("activate_skill", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("skill_name"));

        let err = SkillCommand::parse(
            "load_skill_file",
            json!({"skill_name": "pdf", "file_path": "a", "extra": true}),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        let err = SkillCommand::parse(
            "run_skill_script",
            json!({"skill_name": "pdf", "script_path": "s.sh", "args": "not-a-list"}),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_unknown_tool() {
        let err = SkillCommand::parse("bash", json!({"command": "ls"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: bash");
    }
}
