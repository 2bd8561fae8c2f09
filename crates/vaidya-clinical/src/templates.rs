//! Instruction templates for the four clinical operations.
//!
//! Each template states the assistant's role, substitutes the input fields,
//! and names the fields the answer must contain. Placeholders are `{{field}}`
//! with the input field's wire name.

use vaidya_contracts::operation::OperationKind;
use vaidya_core::PromptTemplate;

pub const TRANSLATE_TERM: &str = "\
You are an expert in translating AYUSH (traditional medicine) terminology into standardized medical codes such as ICD-11.

Given the AYUSH term and its context (if available), provide the most appropriate standardized medical codes and explain your reasoning for selecting those codes.

AYUSH Term: {{ayushTerm}}
Context: {{context}}

Output the standardized medical codes and the reasoning behind their selection.
Ensure that the standardizedCodes field is an array of strings, and the reasoning field is a string.";

pub const SUGGEST_TREATMENT: &str = "\
You are an AI assistant specialized in providing personalized treatment suggestions based on both AYUSH and allopathic medical records.
Consider potential interactions and contraindications between the two systems of medicine.

Allopathic Record: {{allopathicRecord}}
AYUSH Record: {{ayushRecord}}

Provide treatment suggestions in the treatmentSuggestions field.";

pub const PREDICT_PROGRESSION: &str = "\
You are an expert medical researcher specializing in disease progression and risk prediction.

Based on the integrated patient data from both allopathic and AYUSH records, predict the disease progression and potential health risks. Provide a detailed explanation of your reasoning.

Allopathic Data: {{allopathicData}}
AYUSH Data: {{ayushData}}

Answer with the diseaseProgressionPrediction and potentialHealthRisks fields.";

pub const IDENTIFY_INTERACTIONS: &str = "\
You are an expert in pharmacology, specializing in identifying interactions between AYUSH and allopathic medications.

Given the following information about a patient and their medications, identify any potential interactions between the AYUSH and allopathic medications.

AYUSH Medications: {{ayushMedications}}
Allopathic Medications: {{allopathicMedications}}
Patient Details: {{patientDetails}}

Provide a list of potential interactions in the interactions field and a summary of the potential risks and recommendations in the summary field.";

/// The template for `kind`.
pub fn template_for(kind: OperationKind) -> PromptTemplate {
    let text = match kind {
        OperationKind::TranslateTerm => TRANSLATE_TERM,
        OperationKind::SuggestTreatment => SUGGEST_TREATMENT,
        OperationKind::PredictProgression => PREDICT_PROGRESSION,
        OperationKind::IdentifyInteractions => IDENTIFY_INTERACTIONS,
    };
    PromptTemplate::new(kind.as_str(), text)
}
