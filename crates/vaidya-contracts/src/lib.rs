//! # vaidya-contracts
//!
//! Shared types, schemas, and contracts for the VaidyaConnect invocation
//! pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod invocation;
pub mod operation;
pub mod schema;
