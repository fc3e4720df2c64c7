//! Registry-backed tool dispatcher
//!
//! [`SkillToolbox`] is what a host wires into its tool-calling loop: it
//! publishes the three tool definitions and turns each call into a
//! [`ToolOutcome`]. Errors never escape as `Err`; they become error outcomes.

use std::sync::Arc;

use serde_json::{json, Value};
use skillcage_skills::{Skill, SkillsRegistry};
use skillcage_types::{Tool, ToolCall, ToolOutcome};
use tracing::{debug, info, warn};

use crate::approval::{ApprovalGate, ScriptApproval};
use crate::command::SkillCommand;
use crate::definitions;
use crate::error::{Result, ToolError};

/// Exposes a [`SkillsRegistry`] as agent tools
pub struct SkillToolbox {
    registry: Arc<SkillsRegistry>,
    approval: Arc<dyn ApprovalGate>,
}

impl SkillToolbox {
    /// Create a toolbox over `registry`; every script run is put to `approval`
    pub fn new(registry: Arc<SkillsRegistry>, approval: Arc<dyn ApprovalGate>) -> Self {
        Self { registry, approval }
    }

    /// The registry this toolbox reads from
    #[must_use]
    pub fn registry(&self) -> &Arc<SkillsRegistry> {
        &self.registry
    }

    /// Tool definitions to hand to the model, built from the current registry
    #[must_use]
    pub fn definitions(&self) -> Vec<Tool> {
        vec![
            definitions::activate_skill(&self.registry.generate_skills_list()),
            definitions::load_skill_file(),
            definitions::run_skill_script(),
        ]
    }

    /// Handle a model tool call
    pub async fn handle_call(&self, call: &ToolCall) -> ToolOutcome {
        match call.args_value() {
            Ok(args) => self.dispatch(&call.function.name, args).await,
            Err(e) => {
                warn!(tool = %call.function.name, "Malformed tool arguments: {}", e);
                ToolOutcome::error(
                    ToolError::InvalidArguments {
                        tool: call.function.name.clone(),
                        reason: e.to_string(),
                    }
                    .to_string(),
                )
            }
        }
    }

    /// Dispatch a call by tool name with JSON arguments
    pub async fn dispatch(&self, tool_name: &str, args: Value) -> ToolOutcome {
        let result = match SkillCommand::parse(tool_name, args) {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => ToolOutcome::success(data),
            Err(e) => {
                debug!(tool = %tool_name, "Tool call failed: {}", e);
                ToolOutcome::error(e.to_string())
            }
        }
    }

    /// Run a parsed command and return its success payload.
    ///
    /// # Errors
    /// Any [`ToolError`] raised by the command.
    pub async fn execute(&self, command: SkillCommand) -> Result<Value> {
        match command {
            SkillCommand::Activate { skill_name } => self.activate(&skill_name),
            SkillCommand::LoadFile {
                skill_name,
                file_path,
            } => self.load_file(&skill_name, &file_path),
            SkillCommand::RunScript {
                skill_name,
                script_path,
                args,
            } => self.run_script(&skill_name, &script_path, &args).await,
        }
    }

    /// Return the full SKILL.md of a skill.
    ///
    /// # Errors
    /// [`ToolError::SkillNotFound`] for unknown names, or the read failure.
    pub fn activate(&self, skill_name: &str) -> Result<Value> {
        let skill = self.lookup(skill_name)?;
        let content = skill.read_manifest_content()?;

        info!(skill = %skill_name, "Activated skill");
        Ok(json!({
            "skill": skill.name(),
            "content": String::from_utf8_lossy(&content),
            "message": format!("Activated skill: {}", skill.name()),
        }))
    }

    /// Read a file bundled with a skill.
    ///
    /// # Errors
    /// [`ToolError::SkillNotFound`], or confinement and not-found errors naming `file_path`.
    pub fn load_file(&self, skill_name: &str, file_path: &str) -> Result<Value> {
        let skill = self.lookup(skill_name)?;
        let content = skill.read_file(file_path)?;

        debug!(skill = %skill_name, path = %file_path, bytes = content.len(), "Loaded skill file");
        Ok(json!({
            "skill": skill.name(),
            "path": file_path,
            "content": String::from_utf8_lossy(&content),
        }))
    }

    /// Run a skill script once the user approves it.
    ///
    /// The path is checked before the user is asked, so an escaping or missing
    /// script is refused without a prompt.
    ///
    /// # Errors
    /// [`ToolError::SkillNotFound`], a confinement or not-found error,
    /// [`ToolError::Denied`], or [`ToolError::Script`] when the run fails.
    pub async fn run_script(
        &self,
        skill_name: &str,
        script_path: &str,
        args: &[String],
    ) -> Result<Value> {
        let skill = self.lookup(skill_name)?;
        skill.resolve_file(script_path)?;

        let request = ScriptApproval::new(skill.name(), script_path, args, skill.root_path());
        let summary = request.summary();

        if !self.approval.confirm(&request).await {
            info!(skill = %skill_name, script = %script_path, "Script run denied");
            return Err(ToolError::Denied(summary));
        }

        let handle = skill
            .run_script(script_path, args)
            .map_err(|source| ToolError::Script {
                summary: summary.clone(),
                source,
            })?;
        debug!(run_id = %handle.run_id(), script = %handle.script(), "Awaiting skill script");

        let output = handle.await.map_err(|source| ToolError::Script {
            summary: summary.clone(),
            source,
        })?;

        Ok(json!({
            "skill": skill.name(),
            "script": script_path,
            "args": request.args,
            "stdout": output.stdout,
            "stderr": output.stderr,
            "message": format!("{summary}\n\nOutput:\n{}", output.stdout),
        }))
    }

    fn lookup(&self, skill_name: &str) -> Result<Arc<Skill>> {
        self.registry
            .get(skill_name)
            .ok_or_else(|| ToolError::SkillNotFound(skill_name.to_string()))
    }
}

impl std::fmt::Debug for SkillToolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillToolbox")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::approval::DenyAll;
    use skillcage_skills::SearchSpec;
    use std::fs;

    fn toolbox_with_skill() -> (tempfile::TempDir, SkillToolbox) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("pdf");
        fs::create_dir_all(dir.join("references")).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            "---\nname: pdf\ndescription: Work with PDFs\n---\n# PDF\nUse forms.md\n",
        )
        .unwrap();
        fs::write(dir.join("references").join("forms.md"), "Fill the form").unwrap();

        let registry = Arc::new(SkillsRegistry::new());
        registry.discover(&[SearchSpec::new(tmp.path())]);
        (tmp, SkillToolbox::new(registry, Arc::new(DenyAll)))
    }

    #[test]
    fn test_definitions_list_skills() {
        let (_tmp, toolbox) = toolbox_with_skill();
        let tools = toolbox.definitions();
        let names: Vec<_> = tools.iter().map(Tool::name).collect();
        assert_eq!(names, ["activate_skill", "load_skill_file", "run_skill_script"]);
        assert!(tools[0].function.description.contains("pdf"));
    }

    #[test]
    fn test_activate() {
        let (_tmp, toolbox) = toolbox_with_skill();
        let data = toolbox.activate("pdf").unwrap();
        assert_eq!(data["message"], "Activated skill: pdf");
        assert!(data["content"].as_str().unwrap().starts_with("---\nname: pdf"));

        let err = toolbox.activate("docx").unwrap_err();
        assert_eq!(err.to_string(), "Skill 'docx' not found");
    }

    #[test]
    fn test_load_file_names_offending_path() {
        let (_tmp, toolbox) = toolbox_with_skill();
        let data = toolbox.load_file("pdf", "references/forms.md").unwrap();
        assert_eq!(data["content"], "Fill the form");

        let err = toolbox.load_file("pdf", "../other/secret").unwrap_err();
        assert!(err.to_string().contains("../other/secret"));
        let err = toolbox.load_file("pdf", "missing.md").unwrap_err();
        assert_eq!(err.to_string(), "file not found in skill: missing.md");
    }

    #[tokio::test]
    async fn test_dispatch_wraps_errors() {
        let (_tmp, toolbox) = toolbox_with_skill();
        let outcome = toolbox.dispatch("rm_rf", json!({})).await;
        assert_eq!(outcome, ToolOutcome::error("Unknown tool: rm_rf"));

        let outcome = toolbox
            .dispatch("activate_skill", json!({"skill_name": "pdf"}))
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), Some("Activated skill: pdf"));
    }
}
