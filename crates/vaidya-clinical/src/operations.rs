//! Typed operation wrappers.
//!
//! Each wrapper is a closed pairing of one `OperationSpec` with the shared
//! `InvocationAdapter`. Wrappers serialize the typed input, invoke the
//! adapter once, and deserialize the typed output. They never catch errors.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    operation::{
        IdentifyInteractionsInput, IdentifyInteractionsOutput, OperationKind, OperationOutput,
        PredictProgressionInput, PredictProgressionOutput, SuggestTreatmentInput,
        SuggestTreatmentOutput, TranslateTermInput, TranslateTermOutput,
    },
};
use vaidya_core::{InvocationAdapter, OperationSpec};

use crate::{schemas::schema_for, templates::template_for};

/// Binds an operation kind to its typed input and output records.
pub trait Operation {
    const KIND: OperationKind;
    type Input: Serialize;
    type Output: DeserializeOwned + Into<OperationOutput>;
}

pub struct TranslateTerm;
pub struct SuggestTreatment;
pub struct PredictProgression;
pub struct IdentifyInteractions;

impl Operation for TranslateTerm {
    const KIND: OperationKind = OperationKind::TranslateTerm;
    type Input = TranslateTermInput;
    type Output = TranslateTermOutput;
}

impl Operation for SuggestTreatment {
    const KIND: OperationKind = OperationKind::SuggestTreatment;
    type Input = SuggestTreatmentInput;
    type Output = SuggestTreatmentOutput;
}

impl Operation for PredictProgression {
    const KIND: OperationKind = OperationKind::PredictProgression;
    type Input = PredictProgressionInput;
    type Output = PredictProgressionOutput;
}

impl Operation for IdentifyInteractions {
    const KIND: OperationKind = OperationKind::IdentifyInteractions;
    type Input = IdentifyInteractionsInput;
    type Output = IdentifyInteractionsOutput;
}

/// One operation bound to the shared adapter.
pub struct OperationWrapper<O: Operation> {
    spec: OperationSpec,
    adapter: Arc<InvocationAdapter>,
    _operation: PhantomData<fn() -> O>,
}

impl<O: Operation> OperationWrapper<O> {
    /// Build the wrapper from the operation's schema and template.
    ///
    /// Fails with `ConfigError` if the template and input shape disagree.
    pub fn new(adapter: Arc<InvocationAdapter>) -> VaidyaResult<Self> {
        let spec = OperationSpec::new(schema_for(O::KIND), template_for(O::KIND))?;
        Ok(Self {
            spec,
            adapter,
            _operation: PhantomData,
        })
    }

    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    /// Invoke with a typed input.
    pub async fn call(&self, input: &O::Input, cancel: &CancellationToken) -> VaidyaResult<O::Output> {
        let value = serde_json::to_value(input).map_err(|e| {
            VaidyaError::validation("$", format!("input is not serializable: {e}"))
        })?;
        self.call_json(value, cancel).await
    }

    /// Invoke with an untyped JSON input, as received at a JSON boundary.
    pub async fn call_json(&self, input: Value, cancel: &CancellationToken) -> VaidyaResult<O::Output> {
        let output = self.adapter.invoke(&self.spec, input, cancel).await?;
        serde_json::from_value(output).map_err(|e| VaidyaError::SchemaViolation {
            reason: format!("output does not match {}: {e}", O::KIND),
        })
    }
}

/// All four operations over one shared adapter.
pub struct ClinicalOperations {
    pub translate_term: OperationWrapper<TranslateTerm>,
    pub suggest_treatment: OperationWrapper<SuggestTreatment>,
    pub predict_progression: OperationWrapper<PredictProgression>,
    pub identify_interactions: OperationWrapper<IdentifyInteractions>,
}

impl ClinicalOperations {
    pub fn new(adapter: Arc<InvocationAdapter>) -> VaidyaResult<Self> {
        Ok(Self {
            translate_term: OperationWrapper::new(adapter.clone())?,
            suggest_treatment: OperationWrapper::new(adapter.clone())?,
            predict_progression: OperationWrapper::new(adapter.clone())?,
            identify_interactions: OperationWrapper::new(adapter)?,
        })
    }

    /// Invoke the operation named by `kind` with a JSON input and return its
    /// tagged output.
    pub async fn invoke(
        &self,
        kind: OperationKind,
        input: Value,
        cancel: &CancellationToken,
    ) -> VaidyaResult<OperationOutput> {
        Ok(match kind {
            OperationKind::TranslateTerm => self.translate_term.call_json(input, cancel).await?.into(),
            OperationKind::SuggestTreatment => {
                self.suggest_treatment.call_json(input, cancel).await?.into()
            }
            OperationKind::PredictProgression => {
                self.predict_progression.call_json(input, cancel).await?.into()
            }
            OperationKind::IdentifyInteractions => {
                self.identify_interactions.call_json(input, cancel).await?.into()
            }
        })
    }
}
