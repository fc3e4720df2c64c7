//! Tool definitions published to the model

use serde_json::json;
use skillcage_types::Tool;

use crate::command::{ACTIVATE_SKILL_TOOL, LOAD_SKILL_FILE_TOOL, RUN_SKILL_SCRIPT_TOOL};

/// Definition for `activate_skill`; `skills_list` names what is available
#[must_use]
pub fn activate_skill(skills_list: &str) -> Tool {
    Tool::function(
        ACTIVATE_SKILL_TOOL,
        &format!(
            "Activate a skill and return its full SKILL.md instructions.\n\n\
             Call this when a task matches a skill's description, then follow the \
             returned instructions. Referenced files can be read with load_skill_file \
             and bundled scripts run with run_skill_script.\n\n\
             Available skills: {skills_list}"
        ),
        json!({
            "type": "object",
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": "Name of the skill to activate"
                }
            },
            "required": ["skill_name"],
            "additionalProperties": false
        }),
    )
}

/// Definition for `load_skill_file`
#[must_use]
pub fn load_skill_file() -> Tool {
    Tool::function(
        LOAD_SKILL_FILE_TOOL,
        "Read a file bundled with a skill, such as a reference document or template \
         mentioned in its instructions.\n\n\
         The path is relative to the skill directory. Paths that leave the skill \
         directory are refused.",
        json!({
            "type": "object",
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": "Name of the skill that owns the file"
                },
                "file_path": {
                    "type": "string",
                    "description": "Path relative to the skill directory (e.g. references/forms.md)"
                }
            },
            "required": ["skill_name", "file_path"],
            "additionalProperties": false
        }),
    )
}

/// Definition for `run_skill_script`; always requires user approval
#[must_use]
pub fn run_skill_script() -> Tool {
    Tool::function(
        RUN_SKILL_SCRIPT_TOOL,
        "Run an executable script bundled with a skill and return its output.\n\n\
         The user is asked to approve every run. The script runs in the user's \
         current working directory. In arguments, ${SKILL_DIR} is replaced with \
         the skill's absolute directory so scripts can reach their own assets.\n\n\
         A non-zero exit or termination by signal is reported as an error together \
         with the script's stderr.",
        json!({
            "type": "object",
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": "Name of the skill that owns the script"
                },
                "script_path": {
                    "type": "string",
                    "description": "Script path relative to the skill directory (e.g. scripts/convert.sh)"
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Arguments passed to the script, in order"
                }
            },
            "required": ["skill_name", "script_path"],
            "additionalProperties": false
        }),
    )
    .requiring_approval()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_run_script_requires_approval() {
        assert!(activate_skill("none").allows_unattended());
        assert!(load_skill_file().allows_unattended());

        let run = run_skill_script();
        assert!(run.requires_approval());
        assert!(!run.allows_unattended());
    }

    #[test]
    fn test_activate_lists_skills() {
        let tool = activate_skill("pdf: PDF tools");
        assert!(tool.function.description.ends_with("Available skills: pdf: PDF tools"));
        assert_eq!(tool.function.parameters["required"][0], "skill_name");
    }
}
