use anyhow::Context;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use skillcage_logging::LoggingConfig;
use skillcage_skills::SearchSpec;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[skills]
# Directories scanned for skills. A bare string scans direct children only;
# a table can turn on recursive scanning.
paths = [
    "~/.skillcage/skills",
    { path = ".skillcage/skills", recursive = true },
]
# Regular expressions matched against paths below each search root, written
# with a leading '/'; matching directories are skipped
ignore = ["/node_modules(/|$)", "/target(/|$)"]
# Also skip directories listed in .gitignore files of the search roots
gitignore = true

[logging]
level = "info"  # trace, debug, info, warn, error
json = false
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct SkillsConfig {
    #[serde(default)]
    pub paths: Vec<SearchSpec>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default = "default_gitignore")]
    pub gitignore: bool,
}

fn default_gitignore() -> bool {
    true
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            ignore: Vec::new(),
            gitignore: default_gitignore(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.skillcage/skillcage.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".skillcage").join("skillcage.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("Failed to create config directory {}", config_dir.display())
                })?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillcage/skillcage.toml (auto-created if missing)
    /// 2. Local override: ./skillcage.toml (optional)
    /// 3. Environment variables with SKILLCAGE__ prefix (highest priority)
    ///
    /// An explicit `--config` file replaces layers 1 and 2.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let builder = config::Config::builder();
        let builder = match explicit {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                builder.add_source(config::File::from(path.to_path_buf()))
            }
            None => builder
                .add_source(config::File::from(Self::ensure_global_config()?))
                .add_source(config::File::with_name("skillcage").required(false)),
        };

        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config = builder
            .add_source(config::Environment::with_prefix("SKILLCAGE").separator("__"))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }
}
