//! The result envelope that crosses the facade boundary.
//!
//! Serialized as `{"success": true, "data": ...}` or
//! `{"success": false, "error": "..."}` so callers never need to tell a
//! thrown failure from a returned one.

use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEnvelope<T> {
    Success { data: T },
    Failure { error: String },
}

impl<T> ResultEnvelope<T> {
    pub fn success(data: T) -> Self {
        ResultEnvelope::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ResultEnvelope::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    /// The payload, if the call succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            ResultEnvelope::Success { data } => Some(data),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    /// The user-facing error message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ResultEnvelope::Success { data } => Ok(data),
            ResultEnvelope::Failure { error } => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        match self {
            ResultEnvelope::Success { data } => ResultEnvelope::Success { data: f(data) },
            ResultEnvelope::Failure { error } => ResultEnvelope::Failure { error },
        }
    }
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultEnvelope", 2)?;
        match self {
            ResultEnvelope::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ResultEnvelope::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
