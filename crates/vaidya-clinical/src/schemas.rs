//! Input and output shapes for the four clinical operations.
//!
//! Field descriptions double as steering text for the model, so they are
//! written for it as much as for operators.

use vaidya_contracts::{
    operation::OperationKind,
    schema::{FieldSpec, FieldType, OperationSchema, Shape},
};

/// Minimum length of an AYUSH term accepted by translate-term.
pub const MIN_AYUSH_TERM_LEN: usize = 2;

pub fn translate_term() -> OperationSchema {
    OperationSchema {
        schema_id: "translate-term-v1".to_string(),
        operation: OperationKind::TranslateTerm,
        input: Shape::new(vec![
            FieldSpec::required(
                "ayushTerm",
                FieldType::String,
                "The AYUSH term to translate into standardized medical codes.",
            )
            .with_min_length(MIN_AYUSH_TERM_LEN),
            FieldSpec::optional("context", FieldType::String, "Context for the AYUSH term."),
        ]),
        output: Shape::new(vec![
            FieldSpec::required(
                "standardizedCodes",
                FieldType::StringArray,
                "An array of standardized medical codes (e.g., ICD-11) that correspond to the AYUSH term.",
            ),
            FieldSpec::required(
                "reasoning",
                FieldType::String,
                "The reasoning behind the selected standardized medical codes.",
            ),
        ]),
    }
}

pub fn suggest_treatment() -> OperationSchema {
    OperationSchema {
        schema_id: "suggest-treatment-v1".to_string(),
        operation: OperationKind::SuggestTreatment,
        input: Shape::new(vec![
            FieldSpec::required(
                "allopathicRecord",
                FieldType::String,
                "The patient's allopathic medical record.",
            ),
            FieldSpec::required(
                "ayushRecord",
                FieldType::String,
                "The patient's AYUSH medical record.",
            ),
        ]),
        output: Shape::new(vec![FieldSpec::required(
            "treatmentSuggestions",
            FieldType::String,
            "Personalized treatment suggestions based on both AYUSH and allopathic records, considering potential interactions and contraindications.",
        )]),
    }
}

pub fn predict_progression() -> OperationSchema {
    OperationSchema {
        schema_id: "predict-progression-v1".to_string(),
        operation: OperationKind::PredictProgression,
        input: Shape::new(vec![
            FieldSpec::required(
                "allopathicData",
                FieldType::String,
                "Patient data from allopathic records.",
            ),
            FieldSpec::required("ayushData", FieldType::String, "Patient data from AYUSH records."),
        ]),
        output: Shape::new(vec![
            FieldSpec::required(
                "diseaseProgressionPrediction",
                FieldType::String,
                "A prediction of the disease progression.",
            ),
            FieldSpec::required(
                "potentialHealthRisks",
                FieldType::String,
                "Potential health risks based on the patient data.",
            ),
        ]),
    }
}

pub fn identify_interactions() -> OperationSchema {
    OperationSchema {
        schema_id: "identify-interactions-v1".to_string(),
        operation: OperationKind::IdentifyInteractions,
        input: Shape::new(vec![
            FieldSpec::required(
                "ayushMedications",
                FieldType::String,
                "List of AYUSH medications the patient is taking.",
            ),
            FieldSpec::required(
                "allopathicMedications",
                FieldType::String,
                "List of allopathic medications the patient is taking.",
            ),
            FieldSpec::required(
                "patientDetails",
                FieldType::String,
                "Relevant patient details such as age, weight, and existing conditions.",
            ),
        ]),
        output: Shape::new(vec![
            FieldSpec::required(
                "interactions",
                FieldType::StringArray,
                "A list of potential interactions between the medications.",
            ),
            FieldSpec::required(
                "summary",
                FieldType::String,
                "A summary of the potential risks and recommendations.",
            ),
        ]),
    }
}

/// The schema for `kind`.
pub fn schema_for(kind: OperationKind) -> OperationSchema {
    match kind {
        OperationKind::TranslateTerm => translate_term(),
        OperationKind::SuggestTreatment => suggest_treatment(),
        OperationKind::PredictProgression => predict_progression(),
        OperationKind::IdentifyInteractions => identify_interactions(),
    }
}
