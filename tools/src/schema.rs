//! Typed input schemas for tools, rendered and validated as JSON Schema

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON type of a single argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// Schema for one named argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
}

impl PropertySchema {
    fn new(kind: ValueKind, description: &str) -> Self {
        Self {
            kind,
            description: Some(description.to_string()),
            allowed: None,
            items: None,
        }
    }

    pub fn string(description: &str) -> Self {
        Self::new(ValueKind::String, description)
    }

    /// Array whose elements all match `item`
    pub fn array_of(item: PropertySchema, description: &str) -> Self {
        Self {
            items: Some(Box::new(item)),
            ..Self::new(ValueKind::Array, description)
        }
    }

    /// Restrict the value to a fixed set of strings
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Bare element schema (no description), used for array items
    pub fn element(kind: ValueKind) -> Self {
        Self {
            kind,
            description: None,
            allowed: None,
            items: None,
        }
    }
}

/// Argument shape of a tool: always a JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self::object()
    }
}

impl InputSchema {
    /// Empty object schema
    pub fn object() -> Self {
        Self {
            schema_type: "object",
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn required(mut self, name: &str, property: PropertySchema) -> Self {
        self.properties.insert(name.to_string(), property);
        self.required.push(name.to_string());
        self
    }

    pub fn optional(mut self, name: &str, property: PropertySchema) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    /// Render as a JSON Schema document
    pub fn to_json(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| format!("Failed to render schema: {e}"))
    }
}

/// Compile a schema once so every call can be checked cheaply
pub fn compile(schema: &InputSchema) -> Result<jsonschema::Validator, String> {
    let document = schema.to_json()?;
    jsonschema::validator_for(&document).map_err(|e| format!("Invalid JSON schema: {e}"))
}

/// Check call arguments against a compiled schema
pub fn validate(validator: &jsonschema::Validator, arguments: &Value) -> Result<(), String> {
    if !arguments.is_object() {
        return Err("arguments must be a JSON object".to_string());
    }

    if let Err(error) = validator.validate(arguments) {
        return Err(format!("Input validation failed: {error}"));
    }

    Ok(())
}

/// Deserialize validated arguments into a handler's input struct
pub fn parse_input<T: DeserializeOwned>(arguments: Value) -> anyhow::Result<T> {
    serde_json::from_value(arguments).map_err(|e| anyhow::anyhow!("Invalid JSON input: {e}"))
}

/// Serialize a handler's output struct
pub fn serialize_output<T: Serialize>(output: &T) -> anyhow::Result<Value> {
    serde_json::to_value(output).map_err(|e| anyhow::anyhow!("Failed to serialize output: {e}"))
}
