//! # vaidya-core
//!
//! The generative invocation pipeline for VaidyaConnect.
//!
//! This crate provides:
//! - The pipeline traits (`ModelTransport`, `ShapeValidator`, `CredentialCheck`)
//! - `PromptTemplate` and `OperationSpec`, the checked pairing of schema and template
//! - The `InvocationAdapter` that runs validate → render → dispatch → parse → validate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vaidya_core::{InvocationAdapter, OperationSpec, traits::{ModelTransport, ShapeValidator}};
//! ```

pub mod adapter;
pub mod response;
pub mod retry;
pub mod spec;
pub mod template;
pub mod traits;

pub use adapter::{InvocationAdapter, DEFAULT_MAX_CONCURRENT};
pub use retry::RetryPolicy;
pub use spec::OperationSpec;
pub use template::PromptTemplate;
