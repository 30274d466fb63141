//! Argument validation against a [`ParameterType`].
//!
//! Arguments are checked with [`jsonschema`] against the same schema the
//! catalog advertises. Every error the validator reports becomes one
//! [`FieldIssue`], so a call with several bad fields lists all of them. The
//! validated map (tool-level defaults filled in) is then decoded by `serde`
//! into the tool's typed inputs.

use std::fmt;

use jsonschema::JSONSchema;
use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{RegistrationError, ToolResult};
use crate::schema::ParameterType;

/// One invalid field, addressed by a dotted/indexed path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    path: String,
    message: String,
}

impl FieldIssue {
    /// Creates an issue for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the offending field (`user.address.city`, `items[1]`); empty
    /// for the argument object itself.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// What was wrong with it.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let mut segments = error.instance_path.clone().into_vec();
        let message = match &error.kind {
            ValidationErrorKind::Required { property } => {
                segments.push(
                    property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_owned),
                );
                "field required".to_owned()
            }
            _ => error.to_string(),
        };
        Self::new(field_path(segments), message)
    }
}

/// Arguments failed to satisfy a parameter type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    type_name: String,
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Creates an error for `type_name` with the collected issues.
    #[must_use]
    pub fn new(type_name: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self {
            type_name: type_name.into(),
            issues,
        }
    }

    /// Name of the parameter type that rejected the arguments.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Every offending field.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.issues.len();
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{count} validation error{plural} for {}", self.type_name)?;
        for issue in &self.issues {
            if issue.path.is_empty() {
                write!(f, "; {}", issue.message)?;
            } else {
                write!(f, "; {}: {}", issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Compiled argument schema of one parameter type.
///
/// Built once at registration by [`ParameterType::compile`] and reused for
/// every call.
pub struct ArgumentValidator {
    type_name: String,
    defaults: Vec<(String, Value)>,
    schema: JSONSchema,
}

impl ArgumentValidator {
    pub(crate) fn compile(
        type_name: &str,
        schema: &Value,
        defaults: Vec<(String, Value)>,
    ) -> ToolResult<Self> {
        let compiled = JSONSchema::compile(schema).map_err(|err| RegistrationError::InvalidSchema {
            owner: type_name.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            type_name: type_name.to_owned(),
            defaults,
            schema: compiled,
        })
    }

    /// Name of the parameter type this validator checks.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns `true` if `value` satisfies the schema as given.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.schema.is_valid(value)
    }

    /// Validates `value` and returns the argument map with defaults filled
    /// in.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every missing or mistyped field.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Value::Object(arguments) = value else {
            return Err(ValidationError::new(
                &self.type_name,
                vec![FieldIssue::new(
                    "",
                    format!("expected object, found {}", json_kind(value)),
                )],
            ));
        };

        let mut arguments = arguments.clone();
        for (name, default) in &self.defaults {
            if !arguments.contains_key(name) {
                arguments.insert(name.clone(), default.clone());
            }
        }

        let instance = Value::Object(arguments);
        let issues: Vec<FieldIssue> = match self.schema.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|error| FieldIssue::from_error(&error)).collect(),
        };
        if !issues.is_empty() {
            return Err(ValidationError::new(&self.type_name, issues));
        }

        match instance {
            Value::Object(arguments) => Ok(arguments),
            _ => Ok(Map::new()),
        }
    }
}

impl fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("type_name", &self.type_name)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ParameterType {
    /// Validates `value` against this type.
    ///
    /// Compiles the schema on every call; registered tools keep their
    /// compiled [`ArgumentValidator`] instead.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every missing or mistyped field,
    /// or a single issue when the descriptor itself does not compile.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        self.compile()
            .map_err(|err| ValidationError::new(self.name(), vec![FieldIssue::new("", err.to_string())]))?
            .validate(value)
    }
}

/// Renders a JSON pointer (`/items/1/quantity`) as `items[1].quantity`.
fn field_path<I>(segments: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut path = String::new();
    for segment in segments {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validated arguments handed to a tool handler.
///
/// Inferred-mode bindings [`take`](Self::take) one value per parameter;
/// explicit-mode bindings decode the whole map with
/// [`into_typed`](Self::into_typed).
#[derive(Clone, Debug)]
pub struct ToolArgs {
    type_name: String,
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Wraps an already-validated argument map.
    #[must_use]
    pub fn new(type_name: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            values,
        }
    }

    /// Removes and decodes the argument called `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the field when it is absent or
    /// its value does not fit the Rust type (for example an integer out of
    /// range for `u8`).
    pub fn take<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ValidationError> {
        let issue = |message: String| {
            ValidationError::new(self.type_name.clone(), vec![FieldIssue::new(name, message)])
        };
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| issue("field required".to_owned()))?;
        serde_json::from_value(value).map_err(|err| issue(err.to_string()))
    }

    /// Decodes the whole argument object into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `serde` rejects the object.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ValidationError> {
        let Self { type_name, values } = self;
        serde_json::from_value(Value::Object(values))
            .map_err(|err| ValidationError::new(type_name, vec![FieldIssue::new("", err.to_string())]))
    }

    /// Borrows the raw argument map.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}
