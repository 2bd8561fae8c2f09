//! An operation definition: schema plus template, checked once at build time.

use serde_json::Value;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    operation::OperationKind,
    schema::{OperationSchema, Shape},
};

use crate::template::PromptTemplate;

/// One generative operation, ready to be invoked.
///
/// Construction fails if the template references a placeholder the input
/// shape does not declare, so a mismatch surfaces at startup rather than on
/// the first call.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    schema: OperationSchema,
    template: PromptTemplate,
}

impl OperationSpec {
    pub fn new(schema: OperationSchema, template: PromptTemplate) -> VaidyaResult<Self> {
        let unknown: Vec<String> = template
            .placeholders()
            .into_iter()
            .filter(|name| schema.input.field(name).is_none())
            .collect();

        if !unknown.is_empty() {
            return Err(VaidyaError::ConfigError {
                reason: format!(
                    "template '{}' references undeclared input field(s): {}",
                    template.name(),
                    unknown.join(", ")
                ),
            });
        }

        Ok(Self { schema, template })
    }

    pub fn kind(&self) -> OperationKind {
        self.schema.operation
    }

    pub fn schema(&self) -> &OperationSchema {
        &self.schema
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn input_shape(&self) -> &Shape {
        &self.schema.input
    }

    pub fn output_shape(&self) -> &Shape {
        &self.schema.output
    }

    /// Render the template for a validated input value.
    pub fn render(&self, input: &Value) -> VaidyaResult<String> {
        self.template.render(input, &self.schema.input)
    }
}
