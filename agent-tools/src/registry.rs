//! Runtime registry for tool bindings, catalog generation and call dispatch.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use agent_config::RegistryConfig;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::call::{CallRequest, CallResult, ToolSpec};
use crate::error::{CallError, LoadError, RegistrationError, ToolResult};
use crate::loader::{self, LoadReport};
use crate::schema::{ParameterType, ToolInput};
use crate::validate::{ArgumentValidator, ToolArgs};

const MAX_NAME_LEN: usize = 64;

type Handler = dyn Fn(ToolArgs) -> Result<Value, CallError> + Send + Sync;

/// How a tool receives its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingMode {
    /// One structured parameter object.
    Explicit,
    /// One value per declared parameter.
    Inferred,
}

/// Unregistered tool: name, description, parameter type and handler.
///
/// Produced by the [`#[tool]`](macro@crate::tool) attribute (as
/// `<function>_tool()`) or built by hand, then handed to
/// [`ToolRegistry::register`].
#[derive(Clone)]
pub struct ToolBinding {
    name: String,
    description: String,
    parameter_type: ParameterType,
    mode: BindingMode,
    handler: Arc<Handler>,
}

impl ToolBinding {
    /// Binds a function taking a single [`ToolInput`] parameter.
    #[must_use]
    pub fn explicit<P, R, F>(name: impl Into<String>, f: F) -> Self
    where
        P: ToolInput,
        R: Serialize,
        F: Fn(P) -> Result<R, CallError> + Send + Sync + 'static,
    {
        Self::bind(name.into(), P::parameter_type(), BindingMode::Explicit, move |args| {
            f(args.into_typed::<P>()?)
        })
    }

    /// Binds a single-parameter function under a caller-supplied parameter
    /// type.
    ///
    /// The supplied descriptor may carry its own description but must
    /// otherwise be the one `P` derives.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::TypeMismatch`] when `parameter_type`
    /// differs from the descriptor of `P` in name, fields, defaults or nested
    /// definitions.
    pub fn explicit_with<P, R, F>(
        name: impl Into<String>,
        parameter_type: ParameterType,
        f: F,
    ) -> ToolResult<Self>
    where
        P: ToolInput,
        R: Serialize,
        F: Fn(P) -> Result<R, CallError> + Send + Sync + 'static,
    {
        let name = name.into();
        if !P::parameter_type().same_shape(&parameter_type) {
            return Err(RegistrationError::TypeMismatch {
                tool: name,
                expected: std::any::type_name::<P>().to_owned(),
                found: parameter_type.name().to_owned(),
            });
        }

        Ok(Self::bind(name, parameter_type, BindingMode::Explicit, move |args| {
            f(args.into_typed::<P>()?)
        }))
    }

    /// Binds a handler that unpacks one argument per field of
    /// `parameter_type`.
    #[must_use]
    pub fn inferred<R, F>(name: impl Into<String>, parameter_type: ParameterType, f: F) -> Self
    where
        R: Serialize,
        F: Fn(ToolArgs) -> Result<R, CallError> + Send + Sync + 'static,
    {
        Self::bind(name.into(), parameter_type, BindingMode::Inferred, f)
    }

    fn bind<R, F>(name: String, parameter_type: ParameterType, mode: BindingMode, f: F) -> Self
    where
        R: Serialize,
        F: Fn(ToolArgs) -> Result<R, CallError> + Send + Sync + 'static,
    {
        let handler = move |args: ToolArgs| -> Result<Value, CallError> {
            let output = f(args)?;
            serde_json::to_value(output).map_err(|err| {
                CallError::execution(format!("return value is not JSON-serialisable: {err}"))
            })
        };

        Self {
            name,
            description: String::new(),
            parameter_type,
            mode,
            handler: Arc::new(handler),
        }
    }

    /// Sets the description shown to the model.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter type.
    #[must_use]
    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    /// Returns the binding mode.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    fn check(&self) -> ToolResult<ArgumentValidator> {
        validate_tool_name(&self.name)?;
        self.parameter_type.compile()
    }
}

impl fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBinding")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("parameter_type", &self.parameter_type.name())
            .finish_non_exhaustive()
    }
}

/// Registered tool. Cheap to clone; the handler is shared.
#[derive(Clone)]
pub struct ToolEntry {
    name: String,
    description: String,
    parameter_type: Arc<ParameterType>,
    validator: Arc<ArgumentValidator>,
    mode: BindingMode,
    handler: Arc<Handler>,
}

impl ToolEntry {
    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter type.
    #[must_use]
    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    /// Returns the binding mode.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Builds the catalog declaration for this tool.
    #[must_use]
    pub fn spec(&self, titles: bool) -> ToolSpec {
        ToolSpec::function(
            self.name.clone(),
            self.description.clone(),
            self.parameter_type.to_json_schema(titles),
        )
    }

    /// Validates `arguments` and runs the tool.
    ///
    /// Panics raised by the tool body are caught and reported as execution
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Validation`] when the arguments do not match the
    /// parameter type and [`CallError::Execution`] when the tool fails.
    pub fn invoke(&self, arguments: &Value) -> Result<Value, CallError> {
        let values = self.validator.validate(arguments)?;
        let args = ToolArgs::new(self.parameter_type.name(), values);
        let handler = Arc::clone(&self.handler);

        panic::catch_unwind(AssertUnwindSafe(move || handler(args)))
            .unwrap_or_else(|payload| Err(CallError::execution(panic_message(&*payload))))
    }
}

impl fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("parameter_type", &self.parameter_type.name())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct RegistryState {
    tools: IndexMap<String, ToolEntry>,
    loaded_modules: BTreeSet<String>,
}

/// Insertion-ordered table of tools keyed by name.
///
/// Registration and module loading take the write lock; catalog generation
/// and calls only read, so a fully loaded registry can be shared across
/// threads.
#[derive(Default)]
pub struct ToolRegistry {
    config: RegistryConfig,
    inner: RwLock<RegistryState>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("registered", &self.tool_names())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given settings.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            inner: RwLock::default(),
        }
    }

    /// Returns the registry settings.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a binding.
    ///
    /// A tool already registered under the same name is replaced in place:
    /// the last registration wins and keeps the catalog position of the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] when the name is invalid or the
    /// parameter type is malformed. Nothing is registered in that case.
    pub fn register(&self, binding: ToolBinding) -> ToolResult<()> {
        let validator = binding.check()?;
        let entry = self.entry_from(binding, validator);
        self.insert(entry);
        Ok(())
    }

    /// Registers several bindings atomically.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`]; no binding is registered when
    /// any of them is rejected.
    pub fn register_all<I>(&self, bindings: I) -> ToolResult<usize>
    where
        I: IntoIterator<Item = ToolBinding>,
    {
        let checked = bindings
            .into_iter()
            .map(|binding| binding.check().map(|validator| (binding, validator)))
            .collect::<ToolResult<Vec<_>>>()?;

        let count = checked.len();
        for (binding, validator) in checked {
            let entry = self.entry_from(binding, validator);
            self.insert(entry);
        }
        Ok(count)
    }

    /// Registers the binding `bind` builds around `callable` and returns the
    /// callable untouched, so it stays usable outside the registry.
    ///
    /// # Errors
    ///
    /// Propagates the [`RegistrationError`] from [`register`](Self::register).
    pub fn agent_tool<F, B>(&self, callable: F, bind: B) -> ToolResult<F>
    where
        F: Clone,
        B: FnOnce(F) -> ToolBinding,
    {
        self.register(bind(callable.clone()))?;
        Ok(callable)
    }

    /// Registers every discovered tool under `package`.
    ///
    /// See [`loader::load_tools`].
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the package path is blank or matches no
    /// discovered module.
    pub fn load_tools(&self, package: &str) -> Result<LoadReport, LoadError> {
        loader::load_tools(self, package)
    }

    /// Returns the entry registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolEntry> {
        self.read().tools.get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().tools.contains_key(name)
    }

    /// Registered names in catalog order.
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.read().tools.keys().cloned().collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().tools.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().tools.is_empty()
    }

    /// Catalog of every registered tool in registration order.
    #[must_use]
    pub fn generate_tools(&self) -> Vec<ToolSpec> {
        let titles = self.config.schema_titles;
        self.read()
            .tools
            .values()
            .map(|entry| entry.spec(titles))
            .collect()
    }

    /// Runs a model-issued call and wraps the outcome.
    ///
    /// Every failure (unknown tool, malformed JSON, invalid arguments, tool
    /// error or panic) becomes an error-tagged [`CallResult`] carrying the
    /// request's call id; nothing propagates to the caller.
    #[must_use]
    pub fn call_tool(&self, request: &CallRequest) -> CallResult {
        debug!(
            tool = %request.tool_name(),
            call_id = %request.call_id(),
            "dispatching tool call"
        );

        match self.dispatch(request) {
            Ok(output) => CallResult::success(request, &output),
            Err(err) => {
                warn!(
                    tool = %request.tool_name(),
                    call_id = %request.call_id(),
                    kind = ?err.kind(),
                    error = %err,
                    "tool call failed"
                );
                CallResult::failure(request, &err)
            }
        }
    }

    fn dispatch(&self, request: &CallRequest) -> Result<Value, CallError> {
        let entry = self
            .get(request.tool_name())
            .ok_or_else(|| CallError::ToolNotFound {
                name: request.tool_name().to_owned(),
            })?;
        let arguments = parse_arguments(request)?;
        entry.invoke(&arguments)
    }

    pub(crate) fn entries(&self) -> Vec<ToolEntry> {
        self.read().tools.values().cloned().collect()
    }

    pub(crate) fn insert_if_absent(&self, entry: ToolEntry) -> bool {
        let mut state = self.write();
        if state.tools.contains_key(&entry.name) {
            return false;
        }
        state.tools.insert(entry.name.clone(), entry);
        true
    }

    pub(crate) fn is_module_loaded(&self, module: &str) -> bool {
        self.read().loaded_modules.contains(module)
    }

    pub(crate) fn mark_module_loaded(&self, module: &str) {
        self.write().loaded_modules.insert(module.to_owned());
    }

    fn entry_from(&self, binding: ToolBinding, validator: ArgumentValidator) -> ToolEntry {
        let ToolBinding {
            name,
            mut description,
            parameter_type,
            mode,
            handler,
        } = binding;

        if description.is_empty() {
            warn!(tool = %name, "tool has no description");
            if self.config.fallback_description {
                description = format!("Call function `{name}`");
            }
        }

        ToolEntry {
            name,
            description,
            parameter_type: Arc::new(parameter_type),
            validator: Arc::new(validator),
            mode,
            handler,
        }
    }

    fn insert(&self, entry: ToolEntry) {
        let name = entry.name.clone();
        let mode = entry.mode;
        let replaced = self.write().tools.insert(name.clone(), entry).is_some();
        if replaced {
            debug!(tool = %name, ?mode, "replaced existing tool registration");
        } else {
            debug!(tool = %name, ?mode, "registered tool");
        }
    }

    // No writer can panic halfway through an update, so a poisoned lock
    // still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_arguments(request: &CallRequest) -> Result<Value, CallError> {
    let text = request.arguments().trim();
    if text.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text).map_err(|err| CallError::ArgumentParse {
        tool: request.tool_name().to_owned(),
        reason: err.to_string(),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    format!("tool panicked: {detail}")
}

fn validate_tool_name(name: &str) -> ToolResult<()> {
    if name.is_empty() {
        return Err(RegistrationError::InvalidName {
            name: String::new(),
            reason: "tool name cannot be empty".into(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(RegistrationError::InvalidName {
            name: name.into(),
            reason: format!("tool name length must be <= {MAX_NAME_LEN}"),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(RegistrationError::InvalidName {
            name: name.into(),
            reason: "tool name must contain ASCII alphanumeric, dash, or underscore".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CallErrorKind;
    use crate::schema::ParameterSpec;

    fn add_params() -> ParameterType {
        ParameterType::inferred("add")
            .field(ParameterSpec::of::<i64>("a"))
            .field(ParameterSpec::of::<i64>("b"))
    }

    fn add_binding() -> ToolBinding {
        ToolBinding::inferred("add", add_params(), |mut args: ToolArgs| {
            let a: i64 = args.take("a")?;
            let b: i64 = args.take("b")?;
            Ok(json!({ "result": a + b }))
        })
        .with_description("Add two integers.")
    }

    #[test]
    fn register_and_call_tool() {
        let registry = ToolRegistry::new();
        registry.register(add_binding()).unwrap();

        let result = registry.call_tool(&CallRequest::new("call_001", "add", r#"{"a":39,"b":186}"#));

        assert!(!result.is_error());
        assert_eq!(result.call_id(), "call_001");
        assert_eq!(result.content_json().unwrap(), json!({ "result": 225 }));
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let registry = ToolRegistry::new();
        registry.register(add_binding()).unwrap();
        registry
            .register(ToolBinding::inferred(
                "other",
                ParameterType::inferred("other"),
                |_: ToolArgs| Ok("other"),
            ))
            .unwrap();
        registry
            .register(
                ToolBinding::inferred(
                    "add",
                    ParameterType::inferred("add")
                        .field(ParameterSpec::of::<f64>("x")),
                    |mut args: ToolArgs| {
                        let x: f64 = args.take("x")?;
                        Ok(x * 2.0)
                    },
                )
                .with_description("Double a number."),
            )
            .unwrap();

        assert_eq!(registry.tool_names(), vec!["add", "other"]);
        let catalog = registry.generate_tools();
        assert_eq!(catalog[0].description(), "Double a number.");
        assert_eq!(catalog[0].parameters()["required"], json!(["x"]));

        let result = registry.call_tool(&CallRequest::new("c", "add", r#"{"x": 1.5}"#));
        assert_eq!(result.content_json().unwrap(), json!(3.0));
    }

    #[test]
    fn failures_become_results() {
        let registry = ToolRegistry::new();
        registry.register(add_binding()).unwrap();

        let missing = registry.call_tool(&CallRequest::new("c1", "nope", "{}"));
        assert_eq!(missing.error_kind(), Some(CallErrorKind::ToolNotFound));
        assert_eq!(missing.call_id(), "c1");

        let malformed = registry.call_tool(&CallRequest::new("c2", "add", "{a: 1"));
        assert_eq!(malformed.error_kind(), Some(CallErrorKind::ArgumentParseError));
        assert_eq!(malformed.call_id(), "c2");

        let invalid = registry.call_tool(&CallRequest::new("c3", "add", r#"{"a": "x"}"#));
        assert_eq!(invalid.error_kind(), Some(CallErrorKind::ValidationError));
        let payload = invalid.content_json().unwrap();
        assert_eq!(payload["error"]["issues"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn panics_and_errors_are_execution_failures() {
        let registry = ToolRegistry::new();
        registry
            .register(ToolBinding::inferred(
                "explode",
                ParameterType::inferred("explode"),
                |_: ToolArgs| -> Result<(), CallError> { panic!("boom") },
            ))
            .unwrap();
        registry
            .register(ToolBinding::inferred(
                "refuse",
                ParameterType::inferred("refuse"),
                |_: ToolArgs| -> Result<(), CallError> { Err(CallError::execution("no way")) },
            ))
            .unwrap();

        let exploded = registry.call_tool(&CallRequest::new("c1", "explode", ""));
        assert_eq!(exploded.error_kind(), Some(CallErrorKind::ToolExecutionError));
        assert!(exploded.content().contains("tool panicked: boom"));

        let refused = registry.call_tool(&CallRequest::new("c2", "refuse", "{}"));
        assert_eq!(
            refused.content_json().unwrap()["error"]["message"],
            "tool execution failed: no way"
        );
    }

    #[test]
    fn non_serialisable_output_is_execution_failure() {
        let registry = ToolRegistry::new();
        registry
            .register(ToolBinding::inferred(
                "keys",
                ParameterType::inferred("keys"),
                |_: ToolArgs| {
                    let mut map = std::collections::HashMap::new();
                    map.insert((1, 2), "tuple keys cannot be JSON object keys");
                    Ok(map)
                },
            ))
            .unwrap();

        let result = registry.call_tool(&CallRequest::new("c", "keys", "{}"));
        assert_eq!(result.error_kind(), Some(CallErrorKind::ToolExecutionError));
        assert!(result.content().contains("not JSON-serialisable"));
    }

    #[test]
    fn registration_errors_are_immediate() {
        let registry = ToolRegistry::new();

        let untyped = ToolBinding::inferred(
            "bad_example",
            ParameterType::inferred("bad_example").field(ParameterSpec::untyped("no_type_annotation")),
            |_: ToolArgs| Ok(()),
        );
        assert!(matches!(
            registry.register(untyped),
            Err(RegistrationError::MissingType { parameter, .. }) if parameter == "no_type_annotation"
        ));

        let bad_name = ToolBinding::inferred("has space", ParameterType::new("X"), |_: ToolArgs| Ok(()));
        assert!(matches!(
            registry.register(bad_name),
            Err(RegistrationError::InvalidName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_all_is_atomic() {
        let registry = ToolRegistry::new();
        let err = registry
            .register_all([
                add_binding(),
                ToolBinding::inferred("", ParameterType::new("Empty"), |_: ToolArgs| Ok(())),
            ])
            .unwrap_err();

        assert!(matches!(err, RegistrationError::InvalidName { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn fallback_description_is_configurable() {
        let bare = || ToolBinding::inferred("bare", ParameterType::inferred("bare"), |_: ToolArgs| Ok(1));

        let plain = ToolRegistry::new();
        plain.register(bare()).unwrap();
        assert_eq!(plain.generate_tools()[0].description(), "");

        let config = RegistryConfig {
            fallback_description: true,
            ..RegistryConfig::default()
        };
        let described = ToolRegistry::with_config(config);
        described.register(bare()).unwrap();
        assert_eq!(described.generate_tools()[0].description(), "Call function `bare`");
    }

    #[test]
    fn agent_tool_returns_callable_unchanged() {
        fn double(x: i64) -> i64 {
            x * 2
        }

        let registry = ToolRegistry::new();
        let double = registry
            .agent_tool(double as fn(i64) -> i64, |f| {
                ToolBinding::inferred(
                    "double",
                    ParameterType::inferred("double").field(ParameterSpec::of::<i64>("x")),
                    move |mut args: ToolArgs| Ok(f(args.take("x")?)),
                )
            })
            .unwrap();

        assert_eq!(double(21), 42);
        let result = registry.call_tool(&CallRequest::new("c", "double", r#"{"x": 21}"#));
        assert_eq!(result.content_json().unwrap(), json!(42));
    }

    mod lookup {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        pub struct Query {
            pub text: String,
        }
    }

    mod paging {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        pub struct Query {
            pub page: u32,
            pub per_page: u32,
        }
    }

    #[test]
    fn explicit_with_checks_type_identity() {
        let err = ToolBinding::explicit_with(
            "search",
            ParameterType::new("Pong"),
            |q: lookup::Query| Ok(q.text),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::TypeMismatch { expected, found, .. }
                if expected.ends_with("lookup::Query") && found == "Pong"
        ));

        let binding = ToolBinding::explicit_with(
            "search",
            lookup::Query::parameter_type().with_description("Full-text query"),
            |q: lookup::Query| Ok(q.text),
        )
        .unwrap();
        assert_eq!(binding.mode(), BindingMode::Explicit);
        assert_eq!(binding.parameter_type().description(), Some("Full-text query"));
    }

    #[test]
    fn explicit_with_rejects_same_named_type_with_other_fields() {
        let foreign = paging::Query::parameter_type();
        assert_eq!(foreign.name(), lookup::Query::parameter_type().name());

        let err = ToolBinding::explicit_with("search", foreign, |q: lookup::Query| Ok(q.text))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::TypeMismatch { found, .. } if found == "Query"
        ));

        let edited = ParameterType::new("Query").field(ParameterSpec::of::<u64>("text"));
        assert!(ToolBinding::explicit_with("search", edited, |q: lookup::Query| Ok(q.text)).is_err());
    }

    #[test]
    fn explicit_tools_decode_the_whole_object() {
        let registry = ToolRegistry::new();
        registry
            .register(ToolBinding::explicit("paginate", |q: paging::Query| {
                Ok(json!({ "offset": (q.page - 1) * q.per_page }))
            }))
            .unwrap();

        let result = registry.call_tool(&CallRequest::new(
            "c",
            "paginate",
            r#"{"page": 3, "per_page": 20}"#,
        ));
        assert_eq!(result.content_json().unwrap(), json!({ "offset": 40 }));

        let invalid = registry.call_tool(&CallRequest::new("c", "paginate", r#"{"page": -1}"#));
        assert_eq!(invalid.error_kind(), Some(CallErrorKind::ValidationError));
    }
}
