//! Skillcage Types - tool-calling types shared between the skill adapters and a host runtime
//!
//! The shapes follow the OpenAI function-calling schema so a host can forward
//! definitions and calls without translation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Tool Definitions
// ============================================================================

/// Whether a host must ask the user before a tool runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPolicy {
    /// The tool is safe to run without asking.
    #[default]
    Never,
    /// Every call needs explicit user approval, even in unattended sessions.
    Always,
}

/// A tool definition following OpenAI's function calling schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
    /// Host-side policy; never sent to the model.
    #[serde(skip)]
    pub approval: ApprovalPolicy,
}

impl Tool {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
                strict: None,
            },
            approval: ApprovalPolicy::Never,
        }
    }

    /// Mark this tool as requiring user approval before every call.
    #[must_use]
    pub fn requiring_approval(mut self) -> Self {
        self.approval = ApprovalPolicy::Always;
        self
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn requires_approval(&self) -> bool {
        self.approval == ApprovalPolicy::Always
    }

    /// Whether a fully autonomous session may call this tool.
    pub fn allows_unattended(&self) -> bool {
        !self.requires_approval()
    }
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

// ============================================================================
// Tool Calls
// ============================================================================

/// A tool call from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Function call details within a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String, // JSON-encoded arguments
}

impl ToolCall {
    /// Parse the arguments as a specific type
    pub fn parse_args<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.function.arguments)
    }

    /// Parse the arguments as loose JSON; empty arguments become an empty object.
    pub fn args_value(&self) -> Result<Value, serde_json::Error> {
        if self.function.arguments.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.function.arguments)
    }
}

// ============================================================================
// Tool Outcomes
// ============================================================================

/// Tagged result handed back to the host: `{"status": "success"|"error", "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success(Value),
    Error(String),
}

impl ToolOutcome {
    pub fn success(data: impl Into<Value>) -> Self {
        Self::Success(data.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The user-facing message: `data.message` on success, the error text otherwise.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(data) => data.get("message").and_then(Value::as_str),
            Self::Error(message) => Some(message),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_wire_shape() {
        let ok = ToolOutcome::success(json!({"message": "done"}));
        assert_eq!(
            ok.to_json(),
            json!({"status": "success", "data": {"message": "done"}})
        );
        assert_eq!(ok.message(), Some("done"));

        let err = ToolOutcome::error("Skill 'x' not found");
        assert_eq!(
            err.to_json(),
            json!({"status": "error", "data": "Skill 'x' not found"})
        );
        assert!(!err.is_success());
    }

    #[test]
    fn test_approval_policy_not_serialized() {
        let tool = Tool::function("run", "Run it", json!({"type": "object"})).requiring_approval();
        assert!(tool.requires_approval());
        assert!(!tool.allows_unattended());

        let wire = serde_json::to_value(&tool).unwrap();
        assert!(wire.get("approval").is_none());
        assert_eq!(wire["function"]["name"], "run");
    }

    #[test]
    fn test_empty_arguments_parse_as_object() {
        let call = ToolCall {
            id: "call_1".into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: "activate_skill".into(),
                arguments: String::new(),
            },
        };
        assert_eq!(call.args_value().unwrap(), json!({}));
    }
}
