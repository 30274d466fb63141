//! Parameter type descriptors and JSON-Schema emission.
//!
//! Schemas of individual Rust types come from [`schemars`], so serde
//! attributes (`rename`, `rename_all`, `default`, ...) shape the advertised
//! schema exactly as they shape decoding. A [`ParameterType`] arranges those
//! schemas into the argument object of one tool: explicit-mode tools take it
//! whole from their input struct, inferred-mode tools get one field per
//! function parameter from [`#[tool]`](macro@crate::tool).

use std::collections::HashSet;

use schemars::{JsonSchema, SchemaGenerator};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::error::{RegistrationError, ToolResult};
use crate::validate::ArgumentValidator;

/// Structured parameter object accepted by an explicit-mode tool.
///
/// Implemented for every type deriving both `Deserialize` and
/// `schemars::JsonSchema`.
pub trait ToolInput: DeserializeOwned + JsonSchema {
    /// Descriptor for `Self`.
    #[must_use]
    fn parameter_type() -> ParameterType {
        ParameterType::of::<Self>()
    }
}

impl<T: DeserializeOwned + JsonSchema> ToolInput for T {}

/// A single named field of a [`ParameterType`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    name: String,
    schema: Option<Map<String, Value>>,
    definitions: Map<String, Value>,
    default: Option<Value>,
    description: Option<String>,
    required: bool,
}

impl ParameterSpec {
    /// Creates a field holding a `T`.
    ///
    /// The field is required until it receives a default; `Option<T>` only
    /// makes `null` acceptable.
    #[must_use]
    pub fn of<T: JsonSchema>(name: impl Into<String>) -> Self {
        let mut generator = SchemaGenerator::default();
        let schema = generator.subschema_for::<T>();
        Self {
            name: name.into(),
            schema: Some(into_schema_object(json!(schema))),
            definitions: generator.definitions().clone(),
            default: None,
            description: None,
            required: true,
        }
    }

    /// Creates a field with no type annotation.
    ///
    /// Such a field is rejected with [`RegistrationError::MissingType`] when
    /// the owning type is registered.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            definitions: Map::new(),
            default: None,
            description: None,
            required: true,
        }
    }

    fn from_property(name: String, property: Value, required: bool) -> Self {
        let mut schema = into_schema_object(property);
        let default = schema.remove("default");
        let description = match schema.remove("description") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        Self {
            name,
            schema: Some(schema),
            definitions: Map::new(),
            default,
            description,
            required,
        }
    }

    /// Sets the default value, making the field optional.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value schema, or `None` for an untyped field.
    #[must_use]
    pub fn schema(&self) -> Option<&Map<String, Value>> {
        self.schema.as_ref()
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// A field is required unless it has a default or its input type lets
    /// serde omit it.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    fn property(&self) -> Value {
        let mut property = self.schema.clone().unwrap_or_default();
        if let Some(description) = &self.description {
            property.insert("description".into(), description.clone().into());
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        Value::Object(property)
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.schema == other.schema
            && self.default == other.default
            && self.is_required() == other.is_required()
    }
}

/// Named, ordered set of fields describing a tool's arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterType {
    name: String,
    description: Option<String>,
    fields: Vec<ParameterSpec>,
    definitions: Map<String, Value>,
    keywords: Map<String, Value>,
    object: bool,
}

impl ParameterType {
    /// Creates an empty parameter type with the given identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            definitions: Map::new(),
            keywords: Map::new(),
            object: true,
        }
    }

    /// Creates the synthesised type for an inferred-mode tool.
    ///
    /// The identity is derived from the tool name (`add_numbers` becomes
    /// `AddNumbersInput`) so inferred types of different tools never collide.
    #[must_use]
    pub fn inferred(tool_name: &str) -> Self {
        Self::new(format!("{}Input", pascal_case(tool_name)))
    }

    /// Describes `T` from its `JsonSchema` implementation.
    ///
    /// Property names, requiredness and defaults follow `T`'s serde
    /// attributes. Keywords other than the object layout (for example
    /// `additionalProperties` from `deny_unknown_fields`) are kept as-is.
    #[must_use]
    pub fn of<T: JsonSchema>() -> Self {
        let root = json!(schemars::schema_for!(T));
        Self::from_root_schema(T::schema_name().into_owned(), root)
    }

    fn from_root_schema(name: String, root: Value) -> Self {
        let mut root = into_schema_object(root);
        root.remove("$schema");
        root.remove("title");

        let description = match root.remove("description") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        let object = matches!(root.remove("type"), Some(Value::String(kind)) if kind == "object");
        let definitions = match root.remove("$defs") {
            Some(Value::Object(definitions)) => definitions,
            _ => Map::new(),
        };
        let required: HashSet<String> = match root.remove("required") {
            Some(Value::Array(names)) => names
                .into_iter()
                .filter_map(|name| match name {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
            _ => HashSet::new(),
        };
        let fields = match root.remove("properties") {
            Some(Value::Object(properties)) => properties
                .into_iter()
                .map(|(key, property)| {
                    let is_required = required.contains(&key);
                    ParameterSpec::from_property(key, property, is_required)
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name,
            description,
            fields,
            definitions,
            keywords: root,
            object,
        }
    }

    /// Sets the type-level description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = Some(description);
        }
        self
    }

    /// Appends a field, adopting the definitions its schema refers to.
    #[must_use]
    pub fn field(mut self, mut spec: ParameterSpec) -> Self {
        for (key, definition) in std::mem::take(&mut spec.definitions) {
            self.definitions.entry(key).or_insert(definition);
        }
        self.fields.push(spec);
        self
    }

    /// Returns the type identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type-level description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[ParameterSpec] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Names of the required fields, in declaration order.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.is_required())
            .map(ParameterSpec::name)
            .collect()
    }

    /// Returns `true` when both descriptors accept the same arguments.
    ///
    /// Descriptions are ignored; names, fields, defaults, requiredness and
    /// nested definitions must agree.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.object == other.object
            && self.definitions == other.definitions
            && self.keywords == other.keywords
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(left, right)| left.same_shape(right))
    }

    /// Verifies the descriptor is usable.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn check(&self) -> ToolResult<()> {
        self.compile().map(drop)
    }

    /// Checks the descriptor and compiles its schema into a validator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotAnObject`] when the type is not an
    /// object, [`RegistrationError::DuplicateField`] for a repeated name,
    /// [`RegistrationError::MissingType`] for an untyped field,
    /// [`RegistrationError::InvalidDefault`] when a default does not satisfy
    /// its field's schema and [`RegistrationError::InvalidSchema`] when the
    /// schema does not compile.
    pub fn compile(&self) -> ToolResult<ArgumentValidator> {
        if !self.object {
            return Err(RegistrationError::NotAnObject {
                owner: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut defaults = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistrationError::DuplicateField {
                    owner: self.name.clone(),
                    field: field.name.clone(),
                });
            }

            let Some(schema) = &field.schema else {
                return Err(RegistrationError::MissingType {
                    owner: self.name.clone(),
                    parameter: field.name.clone(),
                });
            };

            if let Some(default) = &field.default {
                let mut standalone = schema.clone();
                if !self.definitions.is_empty() {
                    standalone.insert("$defs".into(), Value::Object(self.definitions.clone()));
                }
                let field_validator =
                    ArgumentValidator::compile(&self.name, &Value::Object(standalone), Vec::new())?;
                if !field_validator.accepts(default) {
                    return Err(RegistrationError::InvalidDefault {
                        owner: self.name.clone(),
                        field: field.name.clone(),
                        expected: describe_schema(schema),
                    });
                }
                defaults.push((field.name.clone(), default.clone()));
            }
        }

        ArgumentValidator::compile(&self.name, &self.to_json_schema(false), defaults)
    }

    /// JSON-Schema object with titles.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        self.to_json_schema(true)
    }

    /// JSON-Schema object; `titles` controls the `title` annotations.
    #[must_use]
    pub fn to_json_schema(&self, titles: bool) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field.property());
            if field.is_required() {
                required.push(Value::from(field.name.clone()));
            }
        }

        let mut schema = Map::new();
        if titles {
            schema.insert("title".into(), self.name.clone().into());
        }
        if let Some(description) = &self.description {
            schema.insert("description".into(), description.clone().into());
        }
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        for (key, value) in &self.keywords {
            schema.insert(key.clone(), value.clone());
        }
        if !self.definitions.is_empty() {
            let mut definitions = self.definitions.clone();
            if !titles {
                for definition in definitions.values_mut() {
                    if let Value::Object(definition) = definition {
                        definition.remove("title");
                    }
                }
            }
            schema.insert("$defs".into(), Value::Object(definitions));
        }
        Value::Object(schema)
    }
}

fn into_schema_object(schema: Value) -> Map<String, Value> {
    match schema {
        Value::Object(map) => map,
        // `true` accepts anything; `false` is spelled out as `not {}`.
        Value::Bool(false) => {
            let mut map = Map::new();
            map.insert("not".into(), Value::Object(Map::new()));
            map
        }
        _ => Map::new(),
    }
}

fn describe_schema(schema: &Map<String, Value>) -> String {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        return format!("`{name}`");
    }
    match schema.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        _ => "value for its schema".into(),
    }
}

fn pascal_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;
    use serde::Deserialize;

    use super::*;

    /// A postal address.
    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Address {
        /// City
        city: String,
        street: String,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct User {
        name: String,
        address: Address,
    }

    #[test]
    fn inferred_names_follow_tool_name() {
        assert_eq!(ParameterType::inferred("add_numbers").name(), "AddNumbersInput");
        assert_eq!(ParameterType::inferred("ping").name(), "PingInput");
        assert_ne!(
            ParameterType::inferred("greet_user").name(),
            ParameterType::inferred("create_user").name()
        );
    }

    #[test]
    fn optional_fields_stay_required_without_default() {
        let params = ParameterType::inferred("create_user")
            .field(ParameterSpec::of::<String>("username"))
            .field(ParameterSpec::of::<u32>("age").with_default(json!(18)))
            .field(ParameterSpec::of::<Option<String>>("nickname"))
            .field(ParameterSpec::of::<Option<String>>("team").with_default(Value::Null));

        assert_eq!(params.required(), vec!["username", "nickname"]);
        let schema = params.json_schema();
        assert_eq!(schema["required"], json!(["username", "nickname"]));
        assert_eq!(schema["properties"]["age"]["default"], 18);
        assert!(schema["properties"]["nickname"].get("default").is_none());
        assert_eq!(schema["properties"]["team"]["default"], Value::Null);
    }

    #[test]
    fn nested_types_are_shared_definitions() {
        let input = ParameterType::new("CreateUserInput")
            .with_description("Create a user")
            .field(ParameterSpec::of::<User>("user"))
            .field(ParameterSpec::of::<Vec<Address>>("previous"));

        let schema = input.json_schema();
        assert_eq!(schema["title"], "CreateUserInput");
        assert_eq!(schema["description"], "Create a user");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["user"]["$ref"], "#/$defs/User");
        assert_eq!(
            schema["properties"]["previous"]["items"]["$ref"],
            "#/$defs/Address"
        );
        assert_eq!(
            schema["$defs"]["User"]["properties"]["address"]["$ref"],
            "#/$defs/Address"
        );
        assert_eq!(
            schema["$defs"]["Address"]["properties"]["city"]["description"],
            "City"
        );
        assert_eq!(schema["$defs"]["Address"]["required"], json!(["city", "street"]));
    }

    #[test]
    fn struct_schema_becomes_fields() {
        let params = ParameterType::of::<Address>();
        assert_eq!(params.name(), "Address");
        assert_eq!(params.description(), Some("A postal address."));
        assert_eq!(params.required(), vec!["city", "street"]);
        assert_eq!(params.get("city").and_then(ParameterSpec::description), Some("City"));

        let schema = params.to_json_schema(false);
        assert!(schema.get("title").is_none());
        assert!(schema.get("$schema").is_none());
        assert_eq!(params.json_schema()["title"], "Address");
    }

    #[test]
    fn same_shape_ignores_descriptions_only() {
        let base = ParameterType::of::<Address>();
        assert!(base.same_shape(&ParameterType::of::<Address>().with_description("Where to ship")));

        let renamed_field = ParameterType::new("Address")
            .field(ParameterSpec::of::<String>("town"))
            .field(ParameterSpec::of::<String>("street"));
        assert!(!base.same_shape(&renamed_field));
    }

    #[test]
    fn check_reports_untyped_parameter() {
        let params = ParameterType::inferred("bad_example")
            .field(ParameterSpec::of::<bool>("ok"))
            .field(ParameterSpec::untyped("no_type_annotation"));

        let err = params.check().expect_err("untyped field");
        assert_eq!(
            err,
            RegistrationError::MissingType {
                owner: "BadExampleInput".into(),
                parameter: "no_type_annotation".into(),
            }
        );
    }

    #[test]
    fn check_rejects_duplicates_and_bad_defaults() {
        let duplicated = ParameterType::new("Dup")
            .field(ParameterSpec::of::<i64>("x"))
            .field(ParameterSpec::of::<String>("x"));
        assert!(matches!(
            duplicated.check(),
            Err(RegistrationError::DuplicateField { field, .. }) if field == "x"
        ));

        let bad_default = ParameterType::new("Unit")
            .field(ParameterSpec::of::<String>("unit").with_default(json!(3)));
        assert!(matches!(
            bad_default.check(),
            Err(RegistrationError::InvalidDefault { field, expected, .. })
                if field == "unit" && expected == "string"
        ));

        let nested_default = ParameterType::new("Ship").field(
            ParameterSpec::of::<Address>("to").with_default(json!({ "city": "Oslo" })),
        );
        assert!(matches!(
            nested_default.check(),
            Err(RegistrationError::InvalidDefault { expected, .. }) if expected == "`Address`"
        ));
    }

    #[test]
    fn non_object_inputs_are_rejected() {
        assert!(matches!(
            ParameterType::of::<Vec<String>>().check(),
            Err(RegistrationError::NotAnObject { .. })
        ));
    }
}
