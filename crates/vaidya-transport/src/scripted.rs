//! In-process transport that replays scripted answers.
//!
//! Used by tests to drive the pipeline deterministically and by the demo's
//! offline mode. Every request is recorded so callers can assert what
//! reached the model and how many times.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    invocation::{ModelRequest, ModelResponse},
    operation::OperationKind,
};
use vaidya_core::traits::ModelTransport;

#[derive(Default)]
struct Script {
    queued: VecDeque<VaidyaResult<ModelResponse>>,
    standing: Option<VaidyaResult<ModelResponse>>,
}

/// A transport answering from per-operation scripts.
///
/// For each operation, queued results are returned first in order; after
/// that the standing result (if any) is returned for every call. An
/// operation with nothing scripted fails with a non-retryable
/// `TransportFailure`.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<OperationKind, Script>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `operation` with `response`.
    pub fn respond(self, operation: OperationKind, response: ModelResponse) -> Self {
        self.standing(operation, Ok(response))
    }

    /// Fail every call to `operation` with `error`.
    pub fn fail(self, operation: OperationKind, error: VaidyaError) -> Self {
        self.standing(operation, Err(error))
    }

    /// Queue a one-shot result for the next call to `operation`.
    pub fn then(self, operation: OperationKind, result: VaidyaResult<ModelResponse>) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.entry(operation).or_default().queued.push_back(result);
        }
        self
    }

    fn standing(self, operation: OperationKind, result: VaidyaResult<ModelResponse>) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.entry(operation).or_default().standing = Some(result);
        }
        self
    }

    /// Shared handle to the recorded requests.
    pub fn request_log(&self) -> Arc<Mutex<Vec<ModelRequest>>> {
        self.requests.clone()
    }

    /// Canned, plausible answers for all four operations.
    pub fn offline() -> Self {
        Self::new()
            .respond(
                OperationKind::TranslateTerm,
                ModelResponse::Structured(json!({
                    "standardizedCodes": ["SM2Z", "DA93.Z"],
                    "reasoning": "Offline answer: the term describes impaired digestive fire, which maps most closely to functional dyspepsia in ICD-11 and to the TM2 digestive disorder pattern. Verify with a clinician before use."
                })),
            )
            .respond(
                OperationKind::SuggestTreatment,
                ModelResponse::Structured(json!({
                    "treatmentSuggestions": "Offline answer: continue current allopathic medication as prescribed. Triphala at bedtime may ease digestive complaints; monitor blood sugar when adding herbal preparations. Review with the treating physician."
                })),
            )
            .respond(
                OperationKind::PredictProgression,
                ModelResponse::Structured(json!({
                    "diseaseProgressionPrediction": "Offline answer: with adherence to current treatment the conditions are expected to remain stable over the next 12 months.",
                    "potentialHealthRisks": "Offline answer: cardiovascular risk from combined hypertension and diabetes; digestive symptoms may affect medication absorption."
                })),
            )
            .respond(
                OperationKind::IdentifyInteractions,
                ModelResponse::Structured(json!({
                    "interactions": [
                        "Offline answer: Triphala may add to the glucose-lowering effect of Metformin."
                    ],
                    "summary": "Offline answer: one potential interaction found; monitor blood glucose."
                })),
            )
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn dispatch(&self, request: &ModelRequest) -> VaidyaResult<ModelResponse> {
        debug!(
            invocation_id = %request.invocation_id,
            operation = %request.operation,
            "scripted dispatch"
        );

        self.requests
            .lock()
            .map_err(|_| poisoned())?
            .push(request.clone());

        let mut scripts = self.scripts.lock().map_err(|_| poisoned())?;
        let script = scripts.get_mut(&request.operation);
        let result = script.and_then(|s| s.queued.pop_front().or_else(|| s.standing.clone()));

        result.unwrap_or_else(|| {
            Err(VaidyaError::TransportFailure {
                reason: format!("no scripted response for {}", request.operation),
                retryable: false,
            })
        })
    }
}

fn poisoned() -> VaidyaError {
    VaidyaError::TransportFailure {
        reason: "scripted transport lock poisoned".to_string(),
        retryable: false,
    }
}
