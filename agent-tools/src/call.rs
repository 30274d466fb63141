//! Wire shapes exchanged with a chat-completions style model API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CallError, CallErrorKind};

/// Declaration kind of a catalog entry. Only functions exist today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// A callable function.
    Function,
}

/// Name, description and JSON-Schema parameters of one function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Tool name the model uses in call requests.
    pub name: String,
    /// Human-readable description; may be empty.
    pub description: String,
    /// JSON-Schema `object` describing the arguments.
    pub parameters: Value,
}

/// Catalog entry, serialised as
/// `{"type": "function", "function": {"name", "description", "parameters"}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    kind: ToolKind,
    function: FunctionDefinition,
}

impl ToolSpec {
    /// Creates a function declaration.
    #[must_use]
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: ToolKind::Function,
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// Returns the declaration kind.
    #[must_use]
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.function.description
    }

    /// Returns the parameter schema.
    #[must_use]
    pub fn parameters(&self) -> &Value {
        &self.function.parameters
    }

    /// Returns the whole function declaration.
    #[must_use]
    pub fn definition(&self) -> &FunctionDefinition {
        &self.function
    }
}

/// Model-issued request to run a tool.
///
/// (De)serialises in the tool-call shape
/// `{"id", "type": "function", "function": {"name", "arguments"}}`, where
/// `arguments` is JSON text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ToolCallWire", into = "ToolCallWire")]
pub struct CallRequest {
    call_id: String,
    tool_name: String,
    arguments: String,
}

impl CallRequest {
    /// Creates a request from its parts.
    #[must_use]
    pub fn new(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments: arguments.into(),
        }
    }

    /// Opaque correlation token that the result must echo.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Name of the tool to run.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Raw JSON argument text.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct ToolCallWire {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: ToolKind,
    function: FunctionCallWire,
}

#[derive(Clone, Serialize, Deserialize)]
struct FunctionCallWire {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_kind() -> ToolKind {
    ToolKind::Function
}

impl From<ToolCallWire> for CallRequest {
    fn from(wire: ToolCallWire) -> Self {
        Self {
            call_id: wire.id,
            tool_name: wire.function.name,
            arguments: wire.function.arguments,
        }
    }
}

impl From<CallRequest> for ToolCallWire {
    fn from(request: CallRequest) -> Self {
        Self {
            id: request.call_id,
            kind: ToolKind::Function,
            function: FunctionCallWire {
                name: request.tool_name,
                arguments: request.arguments,
            },
        }
    }
}

/// Tool reply ready to append to the conversation.
///
/// Serialises as `{"role": "tool", "tool_call_id", "content"}`. The content is
/// JSON text: the tool's return value on success or an
/// `{"error": {"kind", "message", ..}}` payload on failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "ToolMessageWire")]
pub struct CallResult {
    call_id: String,
    tool_name: String,
    content: String,
    error: Option<CallErrorKind>,
}

impl CallResult {
    /// Successful result carrying `output`.
    #[must_use]
    pub fn success(request: &CallRequest, output: &Value) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            content: output.to_string(),
            error: None,
        }
    }

    /// Error-tagged result carrying the structured payload of `error`.
    #[must_use]
    pub fn failure(request: &CallRequest, error: &CallError) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            content: error.to_payload().to_string(),
            error: Some(error.kind()),
        }
    }

    /// Echo of the request's call id.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Name of the tool that was requested.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// JSON text placed in the tool message.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Decodes [`content`](Self::content).
    ///
    /// # Errors
    ///
    /// Returns the parser error if the content is not JSON, which only
    /// happens for hand-built results.
    pub fn content_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.content)
    }

    /// Returns `true` when the call failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Failure category, if the call failed.
    #[must_use]
    pub fn error_kind(&self) -> Option<CallErrorKind> {
        self.error
    }
}

#[derive(Serialize)]
struct ToolMessageWire {
    role: &'static str,
    tool_call_id: String,
    content: String,
}

impl From<CallResult> for ToolMessageWire {
    fn from(result: CallResult) -> Self {
        Self {
            role: "tool",
            tool_call_id: result.call_id,
            content: result.content,
        }
    }
}
