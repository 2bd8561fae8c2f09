//! Authentication configuration schema.
//!
//! An `AuthConfig` is deserialized from the `[auth]` table of the TOML
//! configuration and selects which credential check the process runs with.
//!
//! Example:
//! ```toml
//! [auth]
//! mode = "credential-store"
//!
//! [[auth.users]]
//! email = "vaidya@example.com"
//! name = "Dr. Vaidya"
//! password_sha256 = "…"
//! capabilities = ["ai:translate-term", "history:read"]
//! ```

use serde::{Deserialize, Serialize};

use vaidya_contracts::{
    auth::{HISTORY_READ, HISTORY_WRITE},
    operation::OperationKind,
};

/// Which `CredentialCheck` implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Every caller is admitted as the demo practitioner.
    #[default]
    AlwaysAllow,
    /// Callers must present an email and password matching a stored user.
    CredentialStore,
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    /// Hex SHA-256 digest of `"{email}:{password}"`.
    pub password_sha256: String,
    /// Capabilities granted to this user. Empty means `default_capabilities`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

/// The `[auth]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Capabilities granted to users that do not list their own, and to the
    /// always-allow principal.
    pub default_capabilities: Vec<String>,
    pub users: Vec<UserRecord>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            default_capabilities: all_capabilities(),
            users: Vec::new(),
        }
    }
}

/// Every capability the facade checks.
pub fn all_capabilities() -> Vec<String> {
    OperationKind::ALL
        .iter()
        .map(OperationKind::capability)
        .chain([HISTORY_READ.to_string(), HISTORY_WRITE.to_string()])
        .collect()
}
