//! The server action facade: the only error boundary callers see.
//!
//! Every action checks the caller's capabilities, runs its operation, and
//! returns a `ResultEnvelope`. Any failure, including a panic inside the
//! operation, becomes a failure envelope with a fixed message for that
//! action. The concrete cause is logged, never returned.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use vaidya_contracts::{
    auth::{AuthContext, HISTORY_READ, HISTORY_WRITE},
    envelope::ResultEnvelope,
    error::{VaidyaError, VaidyaResult},
    operation::{
        IdentifyInteractionsInput, IdentifyInteractionsOutput, OperationKind,
        PredictProgressionInput, PredictProgressionOutput, SuggestTreatmentInput,
        SuggestTreatmentOutput, TranslateTermInput, TranslateTermOutput,
    },
};
use vaidya_history::{export_csv, CodeHistory, CodeHistoryEntry};

use crate::{
    emr::{icd11_code, tm2_code, EmrCoding, EmrRequest, MIN_DIAGNOSIS_LEN},
    operations::ClinicalOperations,
};

pub const TRANSLATE_TERM_FAILED: &str = "Failed to translate AYUSH term.";
pub const SUGGEST_TREATMENT_FAILED: &str = "Failed to get treatment suggestions.";
pub const PREDICT_PROGRESSION_FAILED: &str = "Failed to predict disease progression.";
pub const IDENTIFY_INTERACTIONS_FAILED: &str = "Failed to identify drug interactions.";
pub const CODE_DIAGNOSIS_FAILED: &str = "Failed to translate diagnosis.";
pub const LOAD_HISTORY_FAILED: &str = "Failed to load code history.";
pub const EXPORT_HISTORY_FAILED: &str = "Failed to export code history.";
pub const ARCHIVE_HISTORY_FAILED: &str = "Failed to archive history entry.";

/// The fixed failure message for an operation's facade action.
pub fn failure_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::TranslateTerm => TRANSLATE_TERM_FAILED,
        OperationKind::SuggestTreatment => SUGGEST_TREATMENT_FAILED,
        OperationKind::PredictProgression => PREDICT_PROGRESSION_FAILED,
        OperationKind::IdentifyInteractions => IDENTIFY_INTERACTIONS_FAILED,
    }
}

pub struct ServerActions {
    operations: ClinicalOperations,
    history: Arc<CodeHistory>,
}

impl ServerActions {
    pub fn new(operations: ClinicalOperations, history: Arc<CodeHistory>) -> Self {
        Self { operations, history }
    }

    pub fn operations(&self) -> &ClinicalOperations {
        &self.operations
    }

    // ── Generative actions ───────────────────────────────────────────────────

    pub async fn get_translated_term(
        &self,
        ctx: &AuthContext,
        input: &TranslateTermInput,
        cancel: &CancellationToken,
    ) -> ResultEnvelope<TranslateTermOutput> {
        let capability = OperationKind::TranslateTerm.capability();
        self.guarded(
            ctx,
            &[capability.as_str()],
            "get_translated_term",
            TRANSLATE_TERM_FAILED,
            self.operations.translate_term.call(input, cancel),
        )
        .await
    }

    pub async fn get_personalized_treatments(
        &self,
        ctx: &AuthContext,
        input: &SuggestTreatmentInput,
        cancel: &CancellationToken,
    ) -> ResultEnvelope<SuggestTreatmentOutput> {
        let capability = OperationKind::SuggestTreatment.capability();
        self.guarded(
            ctx,
            &[capability.as_str()],
            "get_personalized_treatments",
            SUGGEST_TREATMENT_FAILED,
            self.operations.suggest_treatment.call(input, cancel),
        )
        .await
    }

    pub async fn get_disease_prediction(
        &self,
        ctx: &AuthContext,
        input: &PredictProgressionInput,
        cancel: &CancellationToken,
    ) -> ResultEnvelope<PredictProgressionOutput> {
        let capability = OperationKind::PredictProgression.capability();
        self.guarded(
            ctx,
            &[capability.as_str()],
            "get_disease_prediction",
            PREDICT_PROGRESSION_FAILED,
            self.operations.predict_progression.call(input, cancel),
        )
        .await
    }

    pub async fn get_drug_interactions(
        &self,
        ctx: &AuthContext,
        input: &IdentifyInteractionsInput,
        cancel: &CancellationToken,
    ) -> ResultEnvelope<IdentifyInteractionsOutput> {
        let capability = OperationKind::IdentifyInteractions.capability();
        self.guarded(
            ctx,
            &[capability.as_str()],
            "get_drug_interactions",
            IDENTIFY_INTERACTIONS_FAILED,
            self.operations.identify_interactions.call(input, cancel),
        )
        .await
    }

    /// Code an EMR diagnosis: translate it, derive the TM2 and ICD-11 codes,
    /// and record the result in the history.
    pub async fn code_diagnosis(
        &self,
        ctx: &AuthContext,
        request: &EmrRequest,
        cancel: &CancellationToken,
    ) -> ResultEnvelope<EmrCoding> {
        let capability = OperationKind::TranslateTerm.capability();
        self.guarded(
            ctx,
            &[capability.as_str(), HISTORY_WRITE],
            "code_diagnosis",
            CODE_DIAGNOSIS_FAILED,
            self.code_diagnosis_inner(request, cancel),
        )
        .await
    }

    async fn code_diagnosis_inner(
        &self,
        request: &EmrRequest,
        cancel: &CancellationToken,
    ) -> VaidyaResult<EmrCoding> {
        if request.diagnosis.chars().count() < MIN_DIAGNOSIS_LEN {
            return Err(VaidyaError::validation(
                "diagnosis",
                format!("must be at least {MIN_DIAGNOSIS_LEN} characters"),
            ));
        }

        let input = TranslateTermInput {
            ayush_term: request.diagnosis.clone(),
            context: request.context.clone(),
        };
        let translated = self.operations.translate_term.call(&input, cancel).await?;

        let coding = EmrCoding {
            tm2_code: tm2_code(&request.diagnosis, Utc::now().timestamp_millis()),
            icd11_code: icd11_code(&translated.standardized_codes),
            reasoning: translated.reasoning,
        };

        self.history.record(CodeHistoryEntry::new(
            &request.diagnosis,
            &coding.tm2_code,
            &coding.icd11_code,
            request.patient_id.clone(),
        ))?;

        Ok(coding)
    }

    // ── History actions ──────────────────────────────────────────────────────

    /// History entries, most recent first, optionally filtered by `search`.
    pub fn history_entries(
        &self,
        ctx: &AuthContext,
        search: Option<&str>,
    ) -> ResultEnvelope<Vec<CodeHistoryEntry>> {
        self.guarded_sync(ctx, &[HISTORY_READ], "history_entries", LOAD_HISTORY_FAILED, || {
            self.filtered_history(search)
        })
    }

    /// The (optionally filtered) history as CSV.
    pub fn export_history_csv(&self, ctx: &AuthContext, search: Option<&str>) -> ResultEnvelope<String> {
        self.guarded_sync(ctx, &[HISTORY_READ], "export_history_csv", EXPORT_HISTORY_FAILED, || {
            self.filtered_history(search).map(|entries| export_csv(&entries))
        })
    }

    /// Archive a history entry. The payload is false if no entry has `id`.
    pub fn archive_history_entry(&self, ctx: &AuthContext, id: &str) -> ResultEnvelope<bool> {
        self.guarded_sync(ctx, &[HISTORY_WRITE], "archive_history_entry", ARCHIVE_HISTORY_FAILED, || {
            self.history.archive(id)
        })
    }

    fn filtered_history(&self, search: Option<&str>) -> VaidyaResult<Vec<CodeHistoryEntry>> {
        match search {
            Some(term) => self.history.search(term),
            None => self.history.entries(),
        }
    }

    // ── Boundary helpers ─────────────────────────────────────────────────────

    fn authorize(&self, ctx: &AuthContext, capabilities: &[&str], action: &str) -> VaidyaResult<()> {
        for capability in capabilities {
            if !ctx.can(capability) {
                warn!(
                    action,
                    email = %ctx.principal.email,
                    capability = %capability,
                    "capability missing, action denied"
                );
                return Err(VaidyaError::Unauthorized {
                    reason: format!("capability '{capability}' required for '{action}'"),
                });
            }
        }
        Ok(())
    }

    async fn guarded<T, F>(
        &self,
        ctx: &AuthContext,
        capabilities: &[&str],
        action: &'static str,
        failure: &'static str,
        work: F,
    ) -> ResultEnvelope<T>
    where
        F: Future<Output = VaidyaResult<T>>,
    {
        if self.authorize(ctx, capabilities, action).is_err() {
            return ResultEnvelope::failure(failure);
        }

        match AssertUnwindSafe(work).catch_unwind().await {
            Ok(result) => settle(action, failure, result),
            Err(panic) => {
                error!(action, panic = %panic_message(panic.as_ref()), "action panicked");
                ResultEnvelope::failure(failure)
            }
        }
    }

    fn guarded_sync<T>(
        &self,
        ctx: &AuthContext,
        capabilities: &[&str],
        action: &'static str,
        failure: &'static str,
        work: impl FnOnce() -> VaidyaResult<T>,
    ) -> ResultEnvelope<T> {
        if self.authorize(ctx, capabilities, action).is_err() {
            return ResultEnvelope::failure(failure);
        }

        match std::panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(result) => settle(action, failure, result),
            Err(panic) => {
                error!(action, panic = %panic_message(panic.as_ref()), "action panicked");
                ResultEnvelope::failure(failure)
            }
        }
    }
}

fn settle<T>(action: &'static str, failure: &'static str, result: VaidyaResult<T>) -> ResultEnvelope<T> {
    match result {
        Ok(data) => {
            info!(action, "action succeeded");
            ResultEnvelope::success(data)
        }
        Err(err) => {
            error!(action, error_kind = %err.kind(), error = %err, "action failed");
            ResultEnvelope::failure(failure)
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
