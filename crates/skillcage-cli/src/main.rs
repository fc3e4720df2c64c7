mod approval;
mod config;
mod host;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skillcage_types::ToolOutcome;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::approval::TerminalApproval;
use crate::config::Config;
use crate::host::SkillHost;

#[derive(Parser)]
#[command(name = "skillcage")]
#[command(about = "Discover agent skills and call them through confined tools", long_about = None)]
struct Cli {
    /// Config file path (default: ~/.skillcage/skillcage.toml layered with ./skillcage.toml)
    #[arg(long, short, value_name = "PATH", env = "SKILLCAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered skills and any discovery warnings
    List,

    /// Print the skills listing a host would add to its system prompt
    Prompt,

    /// Print the tool definitions as JSON
    Tools,

    /// Activate a skill and print its instructions
    Activate {
        /// Skill name
        skill: String,
    },

    /// Read a file bundled with a skill
    Load {
        /// Skill name
        skill: String,
        /// Path relative to the skill directory
        path: String,
    },

    /// Run a script bundled with a skill (asks for approval first)
    Run {
        /// Skill name
        skill: String,
        /// Script path relative to the skill directory
        script: String,
        /// Arguments passed to the script; ${SKILL_DIR} is expanded
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Dispatch a raw tool call by name with JSON arguments
    Call {
        /// Tool name, e.g. activate_skill
        tool: String,
        /// JSON object with the tool arguments
        #[arg(default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;
    skillcage_logging::init_logging(&config.logging)?;
    info!("Starting skillcage");

    let host = SkillHost::start(&config, Arc::new(TerminalApproval))?;
    let toolbox = host.toolbox();

    let outcome = match cli.command {
        Commands::List => {
            print!("{}", host.render_list());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Prompt => {
            println!("{}", host.render_prompt().trim());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Tools => {
            println!("{}", host.render_tools()?);
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Activate { skill } => {
            toolbox
                .dispatch(
                    skillcage_tools::ACTIVATE_SKILL_TOOL,
                    serde_json::json!({ "skill_name": skill }),
                )
                .await
        }
        Commands::Load { skill, path } => {
            toolbox
                .dispatch(
                    skillcage_tools::LOAD_SKILL_FILE_TOOL,
                    serde_json::json!({ "skill_name": skill, "file_path": path }),
                )
                .await
        }
        Commands::Run {
            skill,
            script,
            args,
        } => {
            toolbox
                .dispatch(
                    skillcage_tools::RUN_SKILL_SCRIPT_TOOL,
                    serde_json::json!({ "skill_name": skill, "script_path": script, "args": args }),
                )
                .await
        }
        Commands::Call { tool, args } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("Tool arguments must be valid JSON")?;
            toolbox.dispatch(&tool, args).await
        }
    };

    print_outcome(&outcome)?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_outcome(outcome: &ToolOutcome) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&outcome.to_json())
        .context("Failed to serialize tool outcome")?;
    println!("{rendered}");
    Ok(())
}
