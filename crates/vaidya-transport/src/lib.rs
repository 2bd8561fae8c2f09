//! # vaidya-transport
//!
//! Implementations of the [`ModelTransport`](vaidya_core::traits::ModelTransport)
//! boundary:
//!
//! - [`OllamaTransport`]: async `reqwest` client for an Ollama-compatible
//!   `/api/generate` endpoint, mapping connect errors, timeouts, HTTP 429 and
//!   5xx to retryable `TransportFailure`s
//! - [`ScriptedTransport`]: per-operation canned answers for tests and offline runs

pub mod ollama;
pub mod scripted;

pub use ollama::{is_retryable_status, ModelConfig, OllamaTransport};
pub use scripted::ScriptedTransport;
