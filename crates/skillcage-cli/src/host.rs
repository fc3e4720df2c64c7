use anyhow::{Context, Result};
use skillcage_skills::{DiscoveryReport, GitignoreFilter, PatternFilter, SkillsRegistry};
use skillcage_tools::{ApprovalGate, SkillToolbox};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

/// Discovered skills plus the toolbox that serves them
pub struct SkillHost {
    toolbox: SkillToolbox,
    report: DiscoveryReport,
}

impl SkillHost {
    /// Build the registry from configuration and run discovery
    pub fn start(config: &Config, approval: Arc<dyn ApprovalGate>) -> Result<Self> {
        let filter = PatternFilter::new(&config.skills.ignore)
            .context("Invalid pattern in skills.ignore")?;

        let mut registry = SkillsRegistry::new();
        if !filter.is_empty() {
            registry = registry.with_skip_filter(filter);
        }
        if config.skills.gitignore {
            registry = registry.with_skip_filter(GitignoreFilter::new());
        }
        let registry = Arc::new(registry);

        if config.skills.paths.is_empty() {
            warn!("No skill paths configured");
        }

        let report = registry.discover(&config.skills.paths);
        for warning in &report.warnings {
            warn!(path = %warning.path.display(), "Skill skipped: {}", warning.reason);
        }
        info!(
            "Skills registry initialized with {} skills ({} skipped)",
            registry.len(),
            report.skipped()
        );

        Ok(Self {
            toolbox: SkillToolbox::new(registry, approval),
            report,
        })
    }

    pub fn toolbox(&self) -> &SkillToolbox {
        &self.toolbox
    }

    /// Table of loaded skills followed by discovery warnings
    pub fn render_list(&self) -> String {
        let skills = self.toolbox.registry().skills();
        let mut out = String::new();

        if skills.is_empty() {
            out.push_str("No skills found\n");
        } else {
            let width = skills.iter().map(|s| s.name().len()).max().unwrap_or(0);
            for skill in &skills {
                let _ = writeln!(
                    out,
                    "{:<width$}  {}\n{:<width$}  {}",
                    skill.name(),
                    skill.description(),
                    "",
                    skill.root_path().display(),
                );
            }
        }

        if !self.report.warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for warning in &self.report.warnings {
                let _ = writeln!(out, "  {}: {}", warning.path.display(), warning.reason);
            }
        }

        out
    }

    /// Progressive-disclosure listing for a system prompt
    pub fn render_prompt(&self) -> String {
        self.toolbox.registry().generate_system_prompt()
    }

    /// Tool definitions as pretty JSON
    pub fn render_tools(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.toolbox.definitions())
            .context("Failed to serialize tool definitions")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use skillcage_skills::SearchSpec;
    use skillcage_tools::DenyAll;
    use std::fs;

    fn config_for(root: &std::path::Path, ignore: &[&str]) -> Config {
        let mut config = Config::default();
        config.skills.paths = vec![SearchSpec::recursive(root)];
        config.skills.ignore = ignore.iter().map(ToString::to_string).collect();
        config
    }

    #[test]
    fn test_start_honours_gitignore_setting() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        write_skill(&tmp.path().join("pdf"), "pdf");
        write_skill(&tmp.path().join("scratch"), "scratch");
        fs::write(tmp.path().join(".gitignore"), "scratch/\n").unwrap();

        let mut config = config_for(tmp.path(), &[]);
        let host = SkillHost::start(&config, Arc::new(DenyAll)).unwrap();
        assert_eq!(host.toolbox().registry().skill_names(), vec!["pdf"]);

        config.skills.gitignore = false;
        let host = SkillHost::start(&config, Arc::new(DenyAll)).unwrap();
        assert_eq!(
            host.toolbox().registry().skill_names(),
            vec!["pdf", "scratch"]
        );
    }

    fn write_skill(dir: &std::path::Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: The {name} skill\n---\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_start_applies_ignore_patterns() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("pdf"), "pdf");
        write_skill(&tmp.path().join("node_modules").join("junk"), "junk");

        let host = SkillHost::start(&config_for(tmp.path(), &["/node_modules$"]), Arc::new(DenyAll))
            .unwrap();
        assert_eq!(host.toolbox().registry().skill_names(), vec!["pdf"]);

        let list = host.render_list();
        assert!(list.starts_with("pdf  The pdf skill\n"));
        assert!(!list.contains("Warnings"));
    }

    #[test]
    fn test_list_reports_warnings() {
        let tmp = tempfile::tempdir().unwrap();
        let broken = tmp.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("SKILL.md"), "no header").unwrap();

        let host = SkillHost::start(&config_for(tmp.path(), &[]), Arc::new(DenyAll)).unwrap();
        let list = host.render_list();
        assert!(list.starts_with("No skills found\n"));
        assert!(list.contains("Warnings:"));
        assert!(host.render_prompt().is_empty());
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SkillHost::start(&config_for(tmp.path(), &["("]), Arc::new(DenyAll))
            .err()
            .unwrap();
        assert!(err.to_string().contains("skills.ignore"));
    }

    #[test]
    fn test_render_tools() {
        let host = SkillHost::start(&Config::default(), Arc::new(DenyAll)).unwrap();
        let tools: serde_json::Value = serde_json::from_str(&host.render_tools().unwrap()).unwrap();
        assert_eq!(tools[2]["function"]["name"], "run_skill_script");
        assert!(tools[2].get("approval").is_none());
    }
}
