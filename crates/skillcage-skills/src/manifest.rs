//! Manifest parsing
//!
//! Each skill is a folder containing `SKILL.md`: a `---` fenced YAML header
//! followed by free-form markdown instructions. Only the header is evaluated
//! here; the body is handed to the agent verbatim on activation.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::ManifestError;

/// Fixed manifest filename inside every skill directory
pub const MANIFEST_FILE: &str = "SKILL.md";

/// Names longer than this still load but are flagged
const MAX_NAME_LENGTH: usize = 64;
/// Descriptions longer than this still load but are flagged
const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Skill metadata extracted from the manifest header
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMetadata {
    /// Skill name, trimmed and non-empty
    pub name: String,
    /// Skill description, trimmed and non-empty
    pub description: String,
    /// Every other header key, uninterpreted
    pub extra: Mapping,
}

impl SkillMetadata {
    /// Look up an extra header field by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Parse manifest content into metadata.
///
/// # Errors
/// `NoMetadata` when the document does not open with a fenced header,
/// `MalformedMetadata` when the header is unterminated, is not a YAML mapping,
/// or lacks a non-empty string `name` or `description`.
pub fn parse_manifest(bytes: &[u8]) -> Result<SkillMetadata, ManifestError> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| ManifestError::MalformedMetadata(format!("manifest is not UTF-8: {e}")))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let header = extract_header(content)?;

    let value: Value = serde_yaml::from_str(header)
        .map_err(|e| ManifestError::MalformedMetadata(format!("invalid YAML header: {e}")))?;

    let mut mapping = match value {
        Value::Mapping(m) => m,
        Value::Null => {
            return Err(ManifestError::MalformedMetadata(
                "metadata header is empty".to_string(),
            ))
        }
        _ => {
            return Err(ManifestError::MalformedMetadata(
                "metadata header is not a mapping".to_string(),
            ))
        }
    };

    let name = take_required_string(&mut mapping, "name")?;
    let description = take_required_string(&mut mapping, "description")?;

    let metadata = SkillMetadata {
        name,
        description,
        extra: mapping,
    };
    lint_metadata(&metadata);

    Ok(metadata)
}

/// Return the header text between the opening and closing `---` fences
fn extract_header(content: &str) -> Result<&str, ManifestError> {
    let opening_re = Regex::new(r"\A---[ \t]*\r?\n")
        .map_err(|e| ManifestError::MalformedMetadata(format!("Failed to compile regex: {e}")))?;
    if !opening_re.is_match(content) {
        return Err(ManifestError::NoMetadata);
    }

    let frontmatter_re = Regex::new(r"\A---[ \t]*\r?\n(?:([\s\S]*?)\r?\n)?---[ \t]*(?:\r?\n|\z)")
        .map_err(|e| ManifestError::MalformedMetadata(format!("Failed to compile regex: {e}")))?;

    let captures = frontmatter_re.captures(content).ok_or_else(|| {
        ManifestError::MalformedMetadata("unterminated metadata header".to_string())
    })?;

    Ok(captures.get(1).map_or("", |m| m.as_str()))
}

fn take_required_string(mapping: &mut Mapping, key: &str) -> Result<String, ManifestError> {
    match mapping.remove(key) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ManifestError::MalformedMetadata(format!(
                    "'{key}' must not be empty"
                )))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ManifestError::MalformedMetadata(format!(
            "'{key}' must be a string"
        ))),
        None => Err(ManifestError::MalformedMetadata(format!(
            "missing required field '{key}'"
        ))),
    }
}

/// Flag metadata that loads but breaks the usual naming conventions
fn lint_metadata(metadata: &SkillMetadata) {
    if metadata.name.chars().count() > MAX_NAME_LENGTH {
        warn!(
            "Skill name '{}' exceeds {} characters (was {})",
            metadata.name,
            MAX_NAME_LENGTH,
            metadata.name.chars().count()
        );
    }

    if !metadata
        .name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        warn!(
            "Skill name '{}' should contain only lowercase letters, numbers, and hyphens",
            metadata.name
        );
    }

    if metadata.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        warn!(
            "Skill '{}' description exceeds {} characters (was {})",
            metadata.name,
            MAX_DESCRIPTION_LENGTH,
            metadata.description.chars().count()
        );
    }
}
