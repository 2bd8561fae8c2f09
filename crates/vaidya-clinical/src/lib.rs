//! # vaidya-clinical
//!
//! The four clinical operations of VaidyaConnect, bound to the shared
//! invocation adapter, and the server action facade that fronts them.
//!
//! - `schemas` and `templates` declare each operation's shapes and prompt.
//! - `operations` pairs them into typed wrappers over one adapter.
//! - `facade` is the error boundary: it returns `ResultEnvelope`s with fixed
//!   messages and never lets an error or panic escape.
//! - `emr` and the facade's `code_diagnosis` action cover diagnosis coding
//!   with a persisted history.
//! - `patient` and `fixtures` hold the demo dossiers the treatment,
//!   progression and interaction operations are fed from.
//!
//! All patient data here is hardcoded and fictional.

pub mod emr;
pub mod facade;
pub mod fixtures;
pub mod operations;
pub mod patient;
pub mod schemas;
pub mod templates;

pub use emr::{EmrCoding, EmrRequest};
pub use facade::{failure_message, ServerActions};
pub use fixtures::{find_patient, patients};
pub use operations::{ClinicalOperations, Operation, OperationWrapper};
pub use patient::Patient;


// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use vaidya_contracts::{
        error::{ErrorKind, VaidyaError},
        invocation::ModelResponse,
        operation::{
            IdentifyInteractionsInput, OperationKind, PredictProgressionOutput,
            SuggestTreatmentOutput, TranslateTermInput, TranslateTermOutput,
        },
    };
    use vaidya_transport::ScriptedTransport;

    use crate::{
        fixtures::{find_patient, patients},
        schemas::schema_for,
        templates::template_for,
        testing::{harness, practitioner},
    };
    use vaidya_core::OperationSpec;

    #[test]
    fn every_template_builds_a_spec() {
        for kind in OperationKind::ALL {
            let spec = OperationSpec::new(schema_for(kind), template_for(kind));
            assert!(spec.is_ok(), "{kind}: {:?}", spec.err());
        }
    }

    #[test]
    fn output_shapes_match_typed_records() {
        let translate = serde_json::to_value(TranslateTermOutput {
            standardized_codes: vec![],
            reasoning: String::new(),
        })
        .unwrap();
        let suggest = serde_json::to_value(SuggestTreatmentOutput {
            treatment_suggestions: String::new(),
        })
        .unwrap();
        let predict = serde_json::to_value(PredictProgressionOutput {
            disease_progression_prediction: String::new(),
            potential_health_risks: String::new(),
        })
        .unwrap();

        for (kind, value) in [
            (OperationKind::TranslateTerm, translate),
            (OperationKind::SuggestTreatment, suggest),
            (OperationKind::PredictProgression, predict),
        ] {
            let mut typed: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
            let mut declared: Vec<String> =
                schema_for(kind).output.field_names().map(str::to_string).collect();
            typed.sort();
            declared.sort();
            assert_eq!(typed, declared, "{kind}");
        }
    }

    #[test]
    fn patient_inputs_are_built_from_records() {
        let aarav = find_patient("1").unwrap();

        let suggest = aarav.suggest_treatment_input();
        assert_eq!(
            suggest.allopathic_record,
            "Hypertension: Blood pressure is moderately controlled.\nType 2 Diabetes: Fasting blood sugar levels are stable."
        );
        assert_eq!(
            suggest.ayush_record,
            "Agnimandya (digestive impairment): Patient reports bloating and indigestion."
        );

        let interactions = aarav.identify_interactions_input();
        assert_eq!(interactions.allopathic_medications, "Amlodipine, Metformin");
        assert_eq!(interactions.ayush_medications, "Triphala");
        assert_eq!(interactions.patient_details, "Age: 45, Gender: Male, Blood Type: A+");

        let priya = find_patient("2").unwrap();
        assert_eq!(priya.ayush_herbs(), "Brahmi, Ashwagandha");
        assert_eq!(patients().len(), 3);
        assert!(find_patient("9").is_none());
    }

    // Translate "Amlavata" with context: a successful envelope carrying codes.
    #[tokio::test]
    async fn translate_term_success() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::TranslateTerm,
            ModelResponse::Text(
                "```json\n{\"standardizedCodes\":[\"DA42.1\",\"SM1Z\"],\"reasoning\":\"Hyperacidity maps to gastritis.\"}\n```"
                    .to_string(),
            ),
        ));

        let envelope = h
            .actions
            .get_translated_term(
                &practitioner(),
                &TranslateTermInput {
                    ayush_term: "Amlavata".to_string(),
                    context: Some("burning sensation after meals".to_string()),
                },
                &CancellationToken::new(),
            )
            .await;

        let out = envelope.into_result().unwrap();
        assert_eq!(out.standardized_codes, vec!["DA42.1", "SM1Z"]);

        let requests = h.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("Amlavata"));
        assert!(requests[0].prompt.contains("burning sensation after meals"));
    }

    // A one-character term fails validation before any model call.
    #[tokio::test]
    async fn short_term_is_rejected_without_a_model_call() {
        let h = harness(ScriptedTransport::offline());

        let envelope = h
            .actions
            .get_translated_term(
                &practitioner(),
                &TranslateTermInput {
                    ayush_term: "A".to_string(),
                    context: None,
                },
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(envelope.error(), Some("Failed to translate AYUSH term."));
        assert!(h.requests.lock().unwrap().is_empty());
    }

    // The model times out on every attempt: retries run, then a failure envelope.
    #[tokio::test]
    async fn suggest_treatment_timeout_exhausts_retries() {
        let h = harness(ScriptedTransport::new().fail(
            OperationKind::SuggestTreatment,
            VaidyaError::TransportFailure {
                reason: "timed out".to_string(),
                retryable: true,
            },
        ));
        let patient = find_patient("1").unwrap();

        let envelope = h
            .actions
            .get_personalized_treatments(
                &practitioner(),
                &patient.suggest_treatment_input(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(envelope.error(), Some("Failed to get treatment suggestions."));
        assert_eq!(h.requests.lock().unwrap().len(), 3);
    }

    // Interaction check for Priya: model answers in the first attempt.
    #[tokio::test]
    async fn identify_interactions_for_fixture_patient() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::IdentifyInteractions,
            ModelResponse::Structured(json!({
                "interactions": ["Ashwagandha may potentiate sedation."],
                "summary": "One moderate interaction."
            })),
        ));
        let patient = find_patient("2").unwrap();

        let envelope = h
            .actions
            .get_drug_interactions(
                &practitioner(),
                &patient.identify_interactions_input(),
                &CancellationToken::new(),
            )
            .await;

        let out = envelope.into_result().unwrap();
        assert_eq!(out.interactions.len(), 1);

        let requests = h.requests.lock().unwrap();
        assert!(requests[0].prompt.contains("Brahmi, Ashwagandha"));
        assert!(requests[0].prompt.contains("Sumatriptan"));
    }

    // An empty interaction list is a valid answer.
    #[tokio::test]
    async fn empty_interaction_list_is_success() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::IdentifyInteractions,
            ModelResponse::Structured(json!({ "interactions": [], "summary": "None found." })),
        ));
        let patient = find_patient("3").unwrap();

        let envelope = h
            .actions
            .get_drug_interactions(
                &practitioner(),
                &patient.identify_interactions_input(),
                &CancellationToken::new(),
            )
            .await;

        assert!(envelope.data().unwrap().interactions.is_empty());
    }

    #[tokio::test]
    async fn invoke_by_kind_returns_tagged_outputs() {
        let h = harness(ScriptedTransport::offline());
        let cancel = CancellationToken::new();
        let patient = find_patient("1").unwrap();

        let inputs = [
            (OperationKind::TranslateTerm, json!({ "ayushTerm": "Agnimandya" })),
            (
                OperationKind::SuggestTreatment,
                serde_json::to_value(patient.suggest_treatment_input()).unwrap(),
            ),
            (
                OperationKind::PredictProgression,
                serde_json::to_value(patient.predict_progression_input()).unwrap(),
            ),
            (
                OperationKind::IdentifyInteractions,
                serde_json::to_value(patient.identify_interactions_input()).unwrap(),
            ),
        ];

        for (kind, input) in inputs {
            let output = h.actions.operations().invoke(kind, input, &cancel).await.unwrap();
            assert_eq!(output.kind(), kind);
        }

        let requests = h.requests.lock().unwrap();
        let ops: Vec<OperationKind> = requests.iter().map(|r| r.operation).collect();
        assert_eq!(ops, OperationKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn wrong_typed_output_is_a_schema_violation() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::PredictProgression,
            ModelResponse::Structured(json!({ "diseaseProgressionPrediction": "Stable." })),
        ));
        let patient = find_patient("3").unwrap();

        let err = h
            .actions
            .operations()
            .predict_progression
            .call(&patient.predict_progression_input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(matches!(
            h.actions
                .operations()
                .invoke(
                    OperationKind::PredictProgression,
                    json!({ "allopathicData": "x" }),
                    &CancellationToken::new()
                )
                .await,
            Err(VaidyaError::Validation { .. })
        ));
    }

    // ── Reference scenarios ───────────────────────────────────────────────────

    #[tokio::test]
    async fn translate_wrapper_returns_model_object_unchanged() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::TranslateTerm,
            ModelResponse::Structured(json!({
                "standardizedCodes": ["DA01"],
                "reasoning": "digestive impairment maps to DA01"
            })),
        ));

        let out = h
            .actions
            .operations()
            .translate_term
            .call_json(
                json!({ "ayushTerm": "Agnimandya", "context": "bloating" }),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            out,
            TranslateTermOutput {
                standardized_codes: vec!["DA01".to_string()],
                reasoning: "digestive impairment maps to DA01".to_string(),
            }
        );
        assert_eq!(h.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn interaction_envelope_serializes_success_with_data() {
        let h = harness(ScriptedTransport::new().respond(
            OperationKind::IdentifyInteractions,
            ModelResponse::Structured(json!({
                "interactions": ["Triphala may enhance Warfarin effect"],
                "summary": "monitor INR"
            })),
        ));

        let envelope = h
            .actions
            .get_drug_interactions(
                &practitioner(),
                &IdentifyInteractionsInput {
                    ayush_medications: "Triphala".to_string(),
                    allopathic_medications: "Warfarin".to_string(),
                    patient_details: "Age 60".to_string(),
                },
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": true,
                "data": {
                    "interactions": ["Triphala may enhance Warfarin effect"],
                    "summary": "monitor INR"
                }
            })
        );
    }

    #[tokio::test]
    async fn interaction_timeout_serializes_failure_without_data() {
        let h = harness(ScriptedTransport::new().fail(
            OperationKind::IdentifyInteractions,
            VaidyaError::TransportFailure {
                reason: "request timed out".to_string(),
                retryable: true,
            },
        ));

        let envelope = h
            .actions
            .get_drug_interactions(
                &practitioner(),
                &IdentifyInteractionsInput {
                    ayush_medications: "Triphala".to_string(),
                    allopathic_medications: "Warfarin".to_string(),
                    patient_details: "Age 60".to_string(),
                },
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": false, "error": "Failed to identify drug interactions." })
        );
        assert_eq!(h.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_ayush_term_names_the_field_and_skips_the_model() {
        let h = harness(ScriptedTransport::offline());

        let err = h
            .actions
            .operations()
            .translate_term
            .call_json(json!({ "context": "bloating" }), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            VaidyaError::Validation { field, .. } => assert_eq!(field, "ayushTerm"),
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert!(h.requests.lock().unwrap().is_empty());
    }
}
