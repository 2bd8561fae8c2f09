//! Operation schema and shape-check report types.
//!
//! Every generative operation declares an `InputShape` and an `OutputShape`.
//! The same declaration drives input validation, the schema hint sent to the
//! model, and output validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::operation::OperationKind;

/// The primitive types a shape field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON array whose items are all strings.
    StringArray,
}

impl FieldType {
    /// Human-readable name used in validation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::StringArray => "array of strings",
        }
    }
}

/// A single named field inside a `Shape`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Wire name of the field (camelCase, e.g. "ayushTerm").
    pub name: String,
    /// Declared primitive type.
    pub field_type: FieldType,
    /// Description shown to the model and to operators.
    pub description: String,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Minimum length for strings, or for every item of a string array.
    pub min_length: Option<usize>,
}

impl FieldSpec {
    /// A required field with no length constraint.
    pub fn required(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
            required: true,
            min_length: None,
        }
    }

    /// An optional field with no length constraint.
    pub fn optional(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type, description)
        }
    }

    /// Attach a minimum length constraint.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }
}

/// An ordered record of typed fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shape {
    pub fields: Vec<FieldSpec>,
}

impl Shape {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Look up a field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of every declared field, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Render this shape as a JSON Schema document.
    ///
    /// The document is both the structural validation target and the
    /// schema hint handed to the model transport.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut property = match field.field_type {
                FieldType::String => json!({ "type": "string" }),
                FieldType::StringArray => json!({
                    "type": "array",
                    "items": { "type": "string" }
                }),
            };

            if let Some(min) = field.min_length {
                match field.field_type {
                    FieldType::String => {
                        property["minLength"] = json!(min);
                    }
                    FieldType::StringArray => {
                        property["items"]["minLength"] = json!(min);
                    }
                }
            }

            property["description"] = json!(field.description);
            properties.insert(field.name.clone(), property);

            if field.required {
                required.push(json!(field.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

/// The full request/response contract of one generative operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSchema {
    /// Stable identifier, e.g. "translate-term-v1".
    pub schema_id: String,
    /// Which operation this schema belongs to.
    pub operation: OperationKind,
    /// Fields the caller must supply.
    pub input: Shape,
    /// Fields the model must produce.
    pub output: Shape,
}

/// Result of checking a JSON value against a `Shape`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeReport {
    /// True only if no failures were recorded.
    pub passed: bool,
    /// Every failure found, in field order.
    pub failures: Vec<FieldFailure>,
}

impl ShapeReport {
    /// Build a report from collected failures.
    pub fn from_failures(failures: Vec<FieldFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// One-line summary: `[field] message; [field] message`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single failure inside a `ShapeReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// The offending field, or "$" for the document root.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}
