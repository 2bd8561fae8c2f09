//! Shape validator for the VaidyaConnect pipeline.
//!
//! `SchemaValidator` implements the `ShapeValidator` trait from `vaidya-core`.
//! Validation runs in two phases:
//!
//! 1. **Field checks**: every declared field is checked for presence, type and
//!    minimum length. Failures name the field so input errors can point at it.
//! 2. **Structural**: the value is validated against `Shape::to_json_schema()`
//!    with the `jsonschema` crate. This phase only runs when phase 1 passed,
//!    so a single defect is not reported twice.
//!
//! Undeclared extra fields are tolerated in both phases.

use serde_json::Value;
use tracing::{debug, warn};

use vaidya_contracts::{
    error::VaidyaResult,
    schema::{FieldFailure, FieldSpec, FieldType, Shape, ShapeReport},
};
use vaidya_core::traits::ShapeValidator;

/// Field name used for failures that concern the whole document.
const ROOT: &str = "$";

/// The pipeline's shape validator. Stateless; share freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn check_field(object: &serde_json::Map<String, Value>, field: &FieldSpec) -> Option<String> {
        let value = match object.get(&field.name) {
            None | Some(Value::Null) => {
                return field.required.then(|| "required field is missing".to_string());
            }
            Some(v) => v,
        };

        match field.field_type {
            FieldType::String => {
                let Some(s) = value.as_str() else {
                    return Some(format!("expected {}", field.field_type.describe()));
                };
                match field.min_length {
                    Some(min) if s.chars().count() < min => {
                        Some(format!("must be at least {min} characters"))
                    }
                    _ => None,
                }
            }
            FieldType::StringArray => {
                let Some(items) = value.as_array() else {
                    return Some(format!("expected {}", field.field_type.describe()));
                };
                for (index, item) in items.iter().enumerate() {
                    let Some(s) = item.as_str() else {
                        return Some(format!("item {index} is not a string"));
                    };
                    if let Some(min) = field.min_length {
                        if s.chars().count() < min {
                            return Some(format!("item {index} must be at least {min} characters"));
                        }
                    }
                }
                None
            }
        }
    }

    fn check_structure(value: &Value, shape: &Shape) -> Vec<FieldFailure> {
        let document = shape.to_json_schema();
        match jsonschema::validator_for(&document) {
            Ok(validator) => validator
                .iter_errors(value)
                .map(|error| FieldFailure {
                    field: field_of(&error.instance_path.to_string()),
                    message: format!("JSON Schema violation: {error}"),
                })
                .collect(),
            Err(e) => vec![FieldFailure {
                field: ROOT.to_string(),
                message: format!("invalid JSON Schema document: {e}"),
            }],
        }
    }
}

impl ShapeValidator for SchemaValidator {
    /// Check `value` against `shape`, collecting every failure.
    fn check(&self, value: &Value, shape: &Shape) -> VaidyaResult<ShapeReport> {
        // ── Phase 1: Field checks ─────────────────────────────────────────────
        let mut failures = match value.as_object() {
            None => vec![FieldFailure {
                field: ROOT.to_string(),
                message: "expected a JSON object".to_string(),
            }],
            Some(object) => shape
                .fields
                .iter()
                .filter_map(|field| {
                    Self::check_field(object, field).map(|message| FieldFailure {
                        field: field.name.clone(),
                        message,
                    })
                })
                .collect(),
        };

        // ── Phase 2: JSON Schema structural validation ────────────────────────
        if failures.is_empty() {
            failures = Self::check_structure(value, shape);
        }

        for failure in &failures {
            warn!(field = %failure.field, message = %failure.message, "shape check failure");
        }

        let report = ShapeReport::from_failures(failures);
        debug!(
            passed = report.passed,
            failure_count = report.failures.len(),
            "shape check complete"
        );
        Ok(report)
    }
}

/// First segment of a JSON pointer such as `/standardizedCodes/0`, or the root
/// marker for an empty pointer.
fn field_of(pointer: &str) -> String {
    pointer
        .split('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ROOT.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use vaidya_contracts::schema::{FieldSpec, FieldType, Shape};
    use vaidya_core::traits::ShapeValidator;

    use super::{field_of, SchemaValidator};

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn translate_input() -> Shape {
        Shape::new(vec![
            FieldSpec::required("ayushTerm", FieldType::String, "The AYUSH term.").with_min_length(2),
            FieldSpec::optional("context", FieldType::String, "Additional context."),
        ])
    }

    fn translate_output() -> Shape {
        Shape::new(vec![
            FieldSpec::required("standardizedCodes", FieldType::StringArray, "Codes."),
            FieldSpec::required("reasoning", FieldType::String, "Why."),
        ])
    }

    // ── Field checks ──────────────────────────────────────────────────────────

    #[test]
    fn test_valid_input_passes() {
        let report = SchemaValidator::new()
            .check(&json!({ "ayushTerm": "Agnimandya" }), &translate_input())
            .unwrap();
        assert!(report.passed, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_null_optional_field_passes() {
        let report = SchemaValidator::new()
            .check(&json!({ "ayushTerm": "Vata", "context": null }), &translate_input())
            .unwrap();
        assert!(report.passed, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_missing_required_field_names_field() {
        let report = SchemaValidator::new()
            .check(&json!({ "context": "fever" }), &translate_input())
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].field, "ayushTerm");
        assert!(report.failures[0].message.contains("missing"));
    }

    #[test]
    fn test_short_string_fails_min_length() {
        let report = SchemaValidator::new()
            .check(&json!({ "ayushTerm": "V" }), &translate_input())
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].field, "ayushTerm");
        assert!(report.failures[0].message.contains("at least 2"));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let report = SchemaValidator::new()
            .check(
                &json!({ "standardizedCodes": "SM2Z", "reasoning": 7 }),
                &translate_output(),
            )
            .unwrap();
        assert!(!report.passed);
        let fields: Vec<&str> = report.failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["standardizedCodes", "reasoning"]);
    }

    #[test]
    fn test_non_string_array_item_is_reported() {
        let report = SchemaValidator::new()
            .check(
                &json!({ "standardizedCodes": ["SM2Z", 4], "reasoning": "ok" }),
                &translate_output(),
            )
            .unwrap();
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("item 1"));
    }

    #[test]
    fn test_non_object_fails_at_root() {
        let report = SchemaValidator::new()
            .check(&json!(["not", "an", "object"]), &translate_output())
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].field, "$");
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let report = SchemaValidator::new()
            .check(
                &json!({ "standardizedCodes": [], "reasoning": "none", "confidence": 0.4 }),
                &translate_output(),
            )
            .unwrap();
        assert!(report.passed, "failures: {:?}", report.failures);
    }

    // ── Pointer mapping ───────────────────────────────────────────────────────

    #[test]
    fn test_field_of_pointer() {
        assert_eq!(field_of("/standardizedCodes/0"), "standardizedCodes");
        assert_eq!(field_of(""), "$");
    }
}
