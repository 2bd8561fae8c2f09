//! The generative invocation adapter: the single path from a typed operation
//! call to the language model and back.
//!
//! Every invocation runs the same pipeline:
//!
//!   Validate input → Render → Permit → Dispatch (retry) → Parse → Validate output
//!
//! The transport is never reached with an input that failed validation, and a
//! model answer is never returned without passing the output shape.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    invocation::{InvocationId, ModelRequest, ModelResponse},
};

use crate::{
    response::parse_response,
    retry::RetryPolicy,
    spec::OperationSpec,
    traits::{ModelTransport, ShapeValidator},
};

/// Default number of concurrent transport dispatches.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Shared invocation adapter.
///
/// Construct one per process and share it behind an `Arc`. The only state it
/// carries across calls is the concurrency semaphore.
pub struct InvocationAdapter {
    transport: Arc<dyn ModelTransport>,
    validator: Arc<dyn ShapeValidator>,
    retry: RetryPolicy,
    permits: Semaphore,
}

impl InvocationAdapter {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        validator: Arc<dyn ShapeValidator>,
        retry: RetryPolicy,
        max_concurrent: usize,
    ) -> Self {
        Self {
            transport,
            validator,
            retry,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run one invocation of `spec` with `input`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `input` does not satisfy the input shape
    /// - `TransportFailure` on a non-retryable failure or once attempts run out
    /// - `EmptyOutput` / `SchemaViolation` if the answer is unusable
    /// - `Cancelled` if `cancel` fires before the answer arrives
    pub async fn invoke(
        &self,
        spec: &OperationSpec,
        input: Value,
        cancel: &CancellationToken,
    ) -> VaidyaResult<Value> {
        let invocation_id = InvocationId::new();
        let operation = spec.kind();

        debug!(
            invocation_id = %invocation_id,
            operation = %operation,
            "invocation starting"
        );

        // ── Step 1: Input validation ─────────────────────────────────────────
        let report = self.validator.check(&input, spec.input_shape())?;
        if !report.passed {
            let field = report
                .failures
                .first()
                .map(|f| f.field.clone())
                .unwrap_or_else(|| "$".to_string());
            let summary = report.summary();
            warn!(
                invocation_id = %invocation_id,
                operation = %operation,
                failures = %summary,
                "input rejected"
            );
            return Err(VaidyaError::Validation {
                field,
                reason: summary,
            });
        }

        // ── Step 2: Render ───────────────────────────────────────────────────
        let request = ModelRequest {
            invocation_id,
            operation,
            schema_id: spec.schema().schema_id.clone(),
            prompt: spec.render(&input)?,
            output_schema: spec.output_shape().to_json_schema(),
        };

        // ── Steps 3 & 4: Permit, then dispatch with retry ────────────────────
        let response = self.dispatch(&request, cancel).await?;

        // ── Step 5: Parse ────────────────────────────────────────────────────
        let output = parse_response(response).map_err(|err| {
            warn!(
                invocation_id = %invocation_id,
                operation = %operation,
                error_kind = %err.kind(),
                error = %err,
                "model output unusable"
            );
            err
        })?;

        // ── Step 6: Output validation ────────────────────────────────────────
        let report = self.validator.check(&output, spec.output_shape())?;
        if !report.passed {
            let summary = report.summary();
            warn!(
                invocation_id = %invocation_id,
                operation = %operation,
                failures = %summary,
                "model output violates schema"
            );
            return Err(VaidyaError::SchemaViolation { reason: summary });
        }

        debug!(
            invocation_id = %invocation_id,
            operation = %operation,
            "invocation complete"
        );
        Ok(output)
    }

    /// Acquire a permit and dispatch, retrying retryable failures. The permit
    /// is held until the last attempt finishes.
    async fn dispatch(
        &self,
        request: &ModelRequest,
        cancel: &CancellationToken,
    ) -> VaidyaResult<ModelResponse> {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(VaidyaError::Cancelled),
            permit = self.permits.acquire() => permit.map_err(|_| VaidyaError::TransportFailure {
                reason: "concurrency limiter closed".to_string(),
                retryable: false,
            })?,
        };

        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            debug!(
                invocation_id = %request.invocation_id,
                operation = %request.operation,
                attempt,
                "dispatching to model"
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(VaidyaError::Cancelled),
                result = self.transport.dispatch(request) => result,
            };

            match result {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let backoff = self.retry.backoff_for(attempt);
                    warn!(
                        invocation_id = %request.invocation_id,
                        operation = %request.operation,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "transport failure, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(VaidyaError::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        invocation_id = %request.invocation_id,
                        operation = %request.operation,
                        attempt,
                        error = %err,
                        "transport failure"
                    );
                    return Err(err);
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;

    use vaidya_contracts::{
        error::{VaidyaError, VaidyaResult},
        invocation::{ModelRequest, ModelResponse},
        operation::OperationKind,
        schema::{FieldFailure, FieldSpec, FieldType, OperationSchema, Shape, ShapeReport},
    };

    use crate::{
        retry::RetryPolicy,
        spec::OperationSpec,
        template::PromptTemplate,
        traits::{ModelTransport, ShapeValidator},
    };

    use super::InvocationAdapter;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn make_spec() -> OperationSpec {
        let schema = OperationSchema {
            schema_id: "translate-term-v1".to_string(),
            operation: OperationKind::TranslateTerm,
            input: Shape::new(vec![
                FieldSpec::required("ayushTerm", FieldType::String, "Term."),
                FieldSpec::optional("context", FieldType::String, "Context."),
            ]),
            output: Shape::new(vec![
                FieldSpec::required("standardizedCodes", FieldType::StringArray, "Codes."),
                FieldSpec::required("reasoning", FieldType::String, "Why."),
            ]),
        };
        let template = PromptTemplate::new(
            "translate-term",
            "Translate.\nAYUSH Term: {{ayushTerm}}\nContext: {{context}}",
        );
        OperationSpec::new(schema, template).unwrap()
    }

    fn good_output() -> Value {
        json!({ "standardizedCodes": ["SM2Z"], "reasoning": "close match" })
    }

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff_ms: 1,
            multiplier: 2.0,
            max_backoff_ms: 4,
        }
    }

    fn retryable() -> VaidyaError {
        VaidyaError::TransportFailure {
            reason: "HTTP 503".to_string(),
            retryable: true,
        }
    }

    /// A transport that replays queued results and records every request.
    /// Once the queue is empty it answers with `fallback`.
    struct MockTransport {
        queue: Mutex<VecDeque<VaidyaResult<ModelResponse>>>,
        fallback: VaidyaResult<ModelResponse>,
        requests: Arc<Mutex<Vec<ModelRequest>>>,
    }

    impl MockTransport {
        fn answering(fallback: VaidyaResult<ModelResponse>) -> Self {
            Self {
                queue: Mutex::new(VecDeque::new()),
                fallback,
                requests: Arc::new(Mutex::new(vec![])),
            }
        }

        fn then(self, result: VaidyaResult<ModelResponse>) -> Self {
            self.queue.lock().unwrap().push_back(result);
            self
        }
    }

    #[async_trait]
    impl ModelTransport for MockTransport {
        async fn dispatch(&self, request: &ModelRequest) -> VaidyaResult<ModelResponse> {
            self.requests.lock().unwrap().push(request.clone());
            let queued = self.queue.lock().unwrap().pop_front();
            queued.unwrap_or_else(|| self.fallback.clone())
        }
    }

    /// A transport that never answers.
    struct HangingTransport {
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl ModelTransport for HangingTransport {
        async fn dispatch(&self, _request: &ModelRequest) -> VaidyaResult<ModelResponse> {
            *self.calls.lock().unwrap() += 1;
            std::future::pending::<VaidyaResult<ModelResponse>>().await
        }
    }

    /// A validator that only checks that required fields are present.
    struct PresenceValidator;

    impl ShapeValidator for PresenceValidator {
        fn check(&self, value: &Value, shape: &Shape) -> VaidyaResult<ShapeReport> {
            let failures = shape
                .fields
                .iter()
                .filter(|f| f.required && value.get(&f.name).map_or(true, Value::is_null))
                .map(|f| FieldFailure {
                    field: f.name.clone(),
                    message: "required field is missing".to_string(),
                })
                .collect();
            Ok(ShapeReport::from_failures(failures))
        }
    }

    fn adapter(transport: Arc<dyn ModelTransport>, retry: RetryPolicy) -> InvocationAdapter {
        InvocationAdapter::new(transport, Arc::new(PresenceValidator), retry, 4)
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_successful_invocation_renders_prompt() {
        let transport = MockTransport::answering(Ok(ModelResponse::Structured(good_output())));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), RetryPolicy::no_retry());

        let output = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output, good_output());
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("AYUSH Term: Jwara"));
        assert!(!requests[0].prompt.contains("Context:"));
        assert_eq!(requests[0].schema_id, "translate-term-v1");
        assert_eq!(requests[0].output_schema["required"], json!(["standardizedCodes", "reasoning"]));
    }

    /// Invalid input must never reach the transport.
    #[tokio::test]
    async fn test_invalid_input_blocks_transport() {
        let transport = MockTransport::answering(Ok(ModelResponse::Structured(good_output())));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), RetryPolicy::no_retry());

        let err = adapter
            .invoke(&make_spec(), json!({ "context": "fever" }), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            VaidyaError::Validation { field, .. } => assert_eq!(field, "ayushTerm"),
            other => panic!("expected Validation, got {:?}", other),
        }
        assert!(requests.lock().unwrap().is_empty(), "transport must not be called");
    }

    #[tokio::test]
    async fn test_retryable_failure_then_success() {
        let transport = MockTransport::answering(Ok(ModelResponse::Structured(good_output())))
            .then(Err(retryable()));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), fast_retry(3));

        let output = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output["reasoning"], "close match");
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_is_attempted_once() {
        let transport = MockTransport::answering(Err(VaidyaError::TransportFailure {
            reason: "HTTP 401".to_string(),
            retryable: false,
        }));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), fast_retry(3));

        let err = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, VaidyaError::TransportFailure { retryable: false, .. }));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_returns_transport_failure() {
        let transport = MockTransport::answering(Err(retryable()));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), fast_retry(3));

        let err = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, VaidyaError::TransportFailure { .. }));
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_null_output_is_empty_output() {
        let transport = MockTransport::answering(Ok(ModelResponse::Structured(Value::Null)));
        let adapter = adapter(Arc::new(transport), RetryPolicy::no_retry());

        let err = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, VaidyaError::EmptyOutput { .. }));
    }

    #[tokio::test]
    async fn test_output_missing_field_is_schema_violation() {
        let transport = MockTransport::answering(Ok(ModelResponse::Text(
            r#"{"reasoning": "no codes"}"#.to_string(),
        )));
        let adapter = adapter(Arc::new(transport), RetryPolicy::no_retry());

        let err = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            VaidyaError::SchemaViolation { reason } => {
                assert!(reason.contains("standardizedCodes"), "reason: {}", reason);
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_dispatch_skips_transport() {
        let transport = MockTransport::answering(Ok(ModelResponse::Structured(good_output())));
        let requests = transport.requests.clone();
        let adapter = adapter(Arc::new(transport), RetryPolicy::no_retry());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, VaidyaError::Cancelled));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_dispatch() {
        let calls = Arc::new(Mutex::new(0));
        let transport = HangingTransport { calls: calls.clone() };
        let adapter = Arc::new(adapter(Arc::new(transport), RetryPolicy::no_retry()));

        let cancel = CancellationToken::new();
        let task = {
            let adapter = adapter.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                adapter
                    .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(VaidyaError::Cancelled)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    /// With one permit, a second invocation waits behind a hung first one and
    /// can still be cancelled while queued.
    #[tokio::test]
    async fn test_cancel_while_waiting_for_permit() {
        let calls = Arc::new(Mutex::new(0));
        let transport = HangingTransport { calls: calls.clone() };
        let adapter = Arc::new(InvocationAdapter::new(
            Arc::new(transport),
            Arc::new(PresenceValidator),
            RetryPolicy::no_retry(),
            1,
        ));

        let first_cancel = CancellationToken::new();
        let first = {
            let adapter = adapter.clone();
            let cancel = first_cancel.clone();
            tokio::spawn(async move {
                adapter
                    .invoke(&make_spec(), json!({ "ayushTerm": "Jwara" }), &cancel)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second_cancel = CancellationToken::new();
        second_cancel.cancel();
        let second = adapter
            .invoke(&make_spec(), json!({ "ayushTerm": "Vata" }), &second_cancel)
            .await;

        assert!(matches!(second, Err(VaidyaError::Cancelled)));
        assert_eq!(*calls.lock().unwrap(), 1, "queued call must not reach the transport");

        first_cancel.cancel();
        assert!(matches!(first.await.unwrap(), Err(VaidyaError::Cancelled)));
    }
}
