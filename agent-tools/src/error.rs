//! Error taxonomy for registration, invocation, discovery and merging.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::validate::ValidationError;

/// Result alias for registration-time operations.
pub type ToolResult<T> = Result<T, RegistrationError>;

/// Errors raised synchronously while binding or registering a tool.
///
/// These are programming errors in the tool definition and are never deferred
/// to call time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Tool name is empty or contains characters models reject.
    #[error("invalid tool name `{name}`: {reason}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A parameter was declared without a value type.
    #[error("parameter `{parameter}` of `{owner}` has no type annotation")]
    MissingType {
        /// Parameter type that owns the field.
        owner: String,
        /// Name of the untyped parameter.
        parameter: String,
    },

    /// The same field name appears twice in one parameter type.
    #[error("field `{field}` is declared more than once in `{owner}`")]
    DuplicateField {
        /// Parameter type that owns the field.
        owner: String,
        /// Duplicated field name.
        field: String,
    },

    /// An explicit parameter type does not match the callable's parameter.
    #[error("tool `{tool}` takes `{expected}` but was given parameter type `{found}`")]
    TypeMismatch {
        /// Tool being registered.
        tool: String,
        /// Rust type the callable accepts.
        expected: String,
        /// Type that was supplied.
        found: String,
    },

    /// The parameter type does not describe a JSON object.
    #[error("parameter type `{owner}` must describe a JSON object")]
    NotAnObject {
        /// Offending parameter type.
        owner: String,
    },

    /// The generated schema could not be compiled into a validator.
    #[error("schema of `{owner}` is invalid: {reason}")]
    InvalidSchema {
        /// Parameter type the schema was generated for.
        owner: String,
        /// Message reported by the schema compiler.
        reason: String,
    },

    /// A default value does not satisfy its field's declared type.
    #[error("default for `{field}` in `{owner}` is not a valid {expected}")]
    InvalidDefault {
        /// Parameter type that owns the field.
        owner: String,
        /// Field carrying the default.
        field: String,
        /// Expected JSON kind.
        expected: String,
    },
}

/// Failures of the call pipeline.
///
/// [`ToolRegistry::call_tool`](crate::ToolRegistry::call_tool) never returns
/// these directly; each one is folded into an error-tagged
/// [`CallResult`](crate::CallResult) so the conversation can continue.
#[derive(Debug, Error)]
pub enum CallError {
    /// No tool with the requested name is registered.
    #[error("tool `{name}` is not registered")]
    ToolNotFound {
        /// Requested tool name.
        name: String,
    },

    /// The argument text is not valid JSON.
    #[error("arguments for `{tool}` are not valid JSON: {reason}")]
    ArgumentParse {
        /// Tool the arguments were meant for.
        tool: String,
        /// Parser error message.
        reason: String,
    },

    /// Arguments parsed but did not match the parameter type.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The tool body failed, panicked, or returned a non-serialisable value.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Message carried over from the original failure.
        reason: String,
    },
}

impl CallError {
    /// Wraps any displayable tool failure as an execution error.
    #[must_use]
    pub fn execution(reason: impl fmt::Display) -> Self {
        Self::Execution {
            reason: reason.to_string(),
        }
    }

    /// Returns the category tag reported to the model.
    #[must_use]
    pub fn kind(&self) -> CallErrorKind {
        match self {
            Self::ToolNotFound { .. } => CallErrorKind::ToolNotFound,
            Self::ArgumentParse { .. } => CallErrorKind::ArgumentParseError,
            Self::Validation(_) => CallErrorKind::ValidationError,
            Self::Execution { .. } => CallErrorKind::ToolExecutionError,
        }
    }

    /// Renders the structured payload placed in the tool message content.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(validation) = self {
            error["issues"] = Value::Array(
                validation
                    .issues()
                    .iter()
                    .map(|issue| json!({ "path": issue.path(), "message": issue.message() }))
                    .collect(),
            );
        }
        json!({ "error": error })
    }
}

/// Category tag of a failed call, as seen by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallErrorKind {
    /// See [`CallError::ToolNotFound`].
    ToolNotFound,
    /// See [`CallError::ArgumentParse`].
    ArgumentParseError,
    /// See [`CallError::Validation`].
    ValidationError,
    /// See [`CallError::Execution`].
    ToolExecutionError,
}

/// Errors produced while discovering tool modules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The package path was blank.
    #[error("tool package path cannot be empty")]
    EmptyPackage,

    /// No discovered tool lives at or below the package path.
    #[error("no tool modules found under package `{package}`")]
    PackageNotFound {
        /// Normalised package path.
        package: String,
    },
}

/// Errors produced while merging registries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// `merge_registries` was handed an empty list.
    #[error("cannot merge an empty list of registries")]
    Empty,
}
