//! Per-call invocation types.
//!
//! These values are created for one model call and discarded afterwards.
//! Nothing here is persisted by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::operation::OperationKind;

/// Unique identifier for a single invocation.
///
/// Appears in every log line the adapter emits for the call and is forwarded
/// to the transport so upstream logs can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub uuid::Uuid);

impl InvocationId {
    /// Create a new, unique invocation ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An operation reference plus the concrete input values for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub id: InvocationId,
    pub operation: OperationKind,
    /// Input values, expected to conform to the operation's InputShape.
    pub input: Value,
}

impl InvocationRequest {
    pub fn new(operation: OperationKind, input: Value) -> Self {
        Self {
            id: InvocationId::new(),
            operation,
            input,
        }
    }
}

/// What the model transport receives: a rendered prompt plus the schema the
/// answer must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    pub invocation_id: InvocationId,
    pub operation: OperationKind,
    pub schema_id: String,
    /// Fully rendered instruction text.
    pub prompt: String,
    /// JSON Schema document describing the expected output object.
    pub output_schema: Value,
}

/// The raw answer from a model transport, before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelResponse {
    /// The transport already decoded a JSON value.
    Structured(Value),
    /// Free text that must be parsed against the output schema.
    Text(String),
}
