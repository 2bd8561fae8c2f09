//! # vaidya-verify
//!
//! Shape validation for the VaidyaConnect invocation pipeline.
//!
//! This crate provides [`engine::SchemaValidator`], which implements the
//! [`vaidya_core::traits::ShapeValidator`] trait. The same validator checks
//! caller input before any model call and model output before it is
//! returned, in two phases:
//!
//! 1. **Field checks**: presence, declared type and minimum length, reported
//!    per field name.
//! 2. **Structural**: JSON Schema validation via the `jsonschema` crate
//!    against the document the shape renders, which is also the schema hint
//!    the model receives.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use vaidya_verify::engine::SchemaValidator;
//!
//! let report = SchemaValidator::new().check(&value, &schema.input)?;
//! ```

pub mod engine;

pub use engine::SchemaValidator;
