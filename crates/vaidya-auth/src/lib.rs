//! # vaidya-auth
//!
//! Credential checks that turn presented credentials into an `AuthContext`.
//!
//! ## Overview
//!
//! This crate provides two implementations of the
//! [`CredentialCheck`](vaidya_core::traits::CredentialCheck) trait, selected by
//! the `mode` key of the `[auth]` TOML section:
//!
//! - [`AlwaysAllow`]: admits every caller as a demo practitioner
//! - [`CredentialStore`]: email/password users from TOML, plus runtime signup
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use vaidya_auth::{engine::from_config, AuthConfig};
//!
//! let check = from_config(&AuthConfig::default());
//! let ctx = check.authenticate(None)?;
//! ```

pub mod config;
pub mod engine;

pub use config::{all_capabilities, AuthConfig, AuthMode, UserRecord};
pub use engine::{from_config, password_digest, AlwaysAllow, CredentialStore};

// ── Tests ─────────────────────────────────────────────────────────────────────
