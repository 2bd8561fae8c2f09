//! Core trait definitions for the invocation pipeline.
//!
//! These three traits define the pipeline's seams:
//!
//! - `ModelTransport`: untrusted boundary to the language model
//! - `ShapeValidator`: trusted checker for inputs and model outputs
//! - `CredentialCheck`: gate that turns credentials into an `AuthContext`
//!
//! The adapter wires the first two together in a fixed order; the facade
//! consumes the contexts the third produces.

use async_trait::async_trait;
use serde_json::Value;

use vaidya_contracts::{
    auth::{AuthContext, Credentials},
    error::VaidyaResult,
    invocation::{ModelRequest, ModelResponse},
    schema::{Shape, ShapeReport},
};

/// The sole boundary to the external language model.
///
/// Implementations map every failure mode (connect error, timeout, auth
/// failure, rate limit, non-2xx) to `VaidyaError::TransportFailure`, setting
/// `retryable` for failures another attempt could plausibly fix.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send one rendered prompt with its output schema hint.
    async fn dispatch(&self, request: &ModelRequest) -> VaidyaResult<ModelResponse>;
}

/// Checks a JSON value against a declared `Shape`.
///
/// Used twice per invocation: on the caller's input before any transport
/// call, and on the parsed model output before it is surfaced.
pub trait ShapeValidator: Send + Sync {
    /// Return a report with every failure found. `Err` is reserved for the
    /// validator itself being unusable, not for a failing value.
    fn check(&self, value: &Value, shape: &Shape) -> VaidyaResult<ShapeReport>;
}

/// Turns presented credentials into an `AuthContext`.
pub trait CredentialCheck: Send + Sync {
    /// Authenticate a caller. `None` means no credentials were presented.
    fn authenticate(&self, credentials: Option<&Credentials>) -> VaidyaResult<AuthContext>;

    /// Register a new caller and return its context.
    fn register(&self, credentials: &Credentials, name: &str) -> VaidyaResult<AuthContext>;
}
