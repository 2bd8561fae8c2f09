//! The four generative operations and their typed request/response records.
//!
//! Wire names are camelCase so the JSON exchanged with callers and with the
//! model matches the declared shapes field for field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant for the generative operations the pipeline exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    TranslateTerm,
    SuggestTreatment,
    PredictProgression,
    IdentifyInteractions,
}

impl OperationKind {
    /// Every operation, in menu order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::TranslateTerm,
        OperationKind::SuggestTreatment,
        OperationKind::PredictProgression,
        OperationKind::IdentifyInteractions,
    ];

    /// Stable kebab-case name used in logs, schema ids and capabilities.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::TranslateTerm => "translate-term",
            OperationKind::SuggestTreatment => "suggest-treatment",
            OperationKind::PredictProgression => "predict-progression",
            OperationKind::IdentifyInteractions => "identify-interactions",
        }
    }

    /// The capability a caller must hold to run this operation.
    pub fn capability(&self) -> String {
        format!("ai:{}", self.as_str())
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── translate-term ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTermInput {
    pub ayush_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTermOutput {
    pub standardized_codes: Vec<String>,
    pub reasoning: String,
}

// ── suggest-treatment ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTreatmentInput {
    pub allopathic_record: String,
    pub ayush_record: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTreatmentOutput {
    pub treatment_suggestions: String,
}

// ── predict-progression ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictProgressionInput {
    pub allopathic_data: String,
    pub ayush_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictProgressionOutput {
    pub disease_progression_prediction: String,
    pub potential_health_risks: String,
}

// ── identify-interactions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyInteractionsInput {
    pub ayush_medications: String,
    pub allopathic_medications: String,
    pub patient_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyInteractionsOutput {
    pub interactions: Vec<String>,
    pub summary: String,
}

// ── Tagged output ────────────────────────────────────────────────────────────

/// A completed operation's output, tagged by operation.
///
/// Renderers match on this exhaustively instead of probing an untyped blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "output", rename_all = "kebab-case")]
pub enum OperationOutput {
    TranslateTerm(TranslateTermOutput),
    SuggestTreatment(SuggestTreatmentOutput),
    PredictProgression(PredictProgressionOutput),
    IdentifyInteractions(IdentifyInteractionsOutput),
}

impl OperationOutput {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationOutput::TranslateTerm(_) => OperationKind::TranslateTerm,
            OperationOutput::SuggestTreatment(_) => OperationKind::SuggestTreatment,
            OperationOutput::PredictProgression(_) => OperationKind::PredictProgression,
            OperationOutput::IdentifyInteractions(_) => OperationKind::IdentifyInteractions,
        }
    }
}

impl From<TranslateTermOutput> for OperationOutput {
    fn from(output: TranslateTermOutput) -> Self {
        OperationOutput::TranslateTerm(output)
    }
}

impl From<SuggestTreatmentOutput> for OperationOutput {
    fn from(output: SuggestTreatmentOutput) -> Self {
        OperationOutput::SuggestTreatment(output)
    }
}

impl From<PredictProgressionOutput> for OperationOutput {
    fn from(output: PredictProgressionOutput) -> Self {
        OperationOutput::PredictProgression(output)
    }
}

impl From<IdentifyInteractionsOutput> for OperationOutput {
    fn from(output: IdentifyInteractionsOutput) -> Self {
        OperationOutput::IdentifyInteractions(output)
    }
}
