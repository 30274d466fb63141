//! Tool registration and invocation for function-calling language models.
//!
//! Ordinary functions become tools with the [`tool`] attribute: their
//! parameters are turned into a JSON-Schema catalog entry through
//! [`schemars`], and model-issued call requests are validated with
//! [`jsonschema`], dispatched and wrapped into tool messages by a
//! [`ToolRegistry`].
//!
//! ```ignore
//! use agent_tools::{CallRequest, ToolRegistry, tool};
//!
//! /// Add two integers.
//! #[tool(describe(a = "left operand", b = "right operand"))]
//! fn add(a: i64, b: i64) -> serde_json::Value {
//!     serde_json::json!({ "result": a + b })
//! }
//!
//! let registry = ToolRegistry::new();
//! registry.register(add_tool())?;
//! let reply = registry.call_tool(&CallRequest::new("call_1", "add", r#"{"a":39,"b":186}"#));
//! assert_eq!(reply.content(), r#"{"result":225}"#);
//! ```

#![warn(missing_docs, clippy::pedantic)]

extern crate self as agent_tools;

pub mod call;
pub mod error;
pub mod loader;
pub mod merge;
pub mod registry;
pub mod schema;
pub mod validate;

/// Attribute macro deriving tool bindings from function signatures.
pub use agent_tools_macros::tool;
/// Wire formats exchanged with the model API.
pub use call::{CallRequest, CallResult, FunctionDefinition, ToolKind, ToolSpec};
/// Error taxonomy.
pub use error::{CallError, CallErrorKind, LoadError, MergeError, RegistrationError, ToolResult};
/// Module discovery.
pub use loader::{DiscoveredTool, LoadReport, discovered, load_tools};
/// Cross-registry merging.
pub use merge::{merge_registries, merge_tools};
/// Registry and bindings.
pub use registry::{BindingMode, ToolBinding, ToolEntry, ToolRegistry};
/// Parameter type descriptors.
pub use schema::{ParameterSpec, ParameterType, ToolInput};
/// Validation results and typed arguments.
pub use validate::{ArgumentValidator, FieldIssue, ToolArgs, ValidationError};

/// Registry settings.
pub use agent_config::RegistryConfig;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
    pub use serde_json;
}
