//! Credential checks.
//!
//! Two implementations of `CredentialCheck` from vaidya-core:
//!
//! - `AlwaysAllow` admits every caller as a fixed demo principal holding the
//!   configured capabilities. Suitable for local demos only.
//! - `CredentialStore` holds users loaded from TOML plus any registered at
//!   runtime, and admits a caller only when the email exists and the SHA-256
//!   digest of `"{email}:{password}"` matches.
//!
//! Credential failures never say which half was wrong.

use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use vaidya_contracts::{
    auth::{AuthContext, CapabilitySet, Credentials, Principal},
    error::{VaidyaError, VaidyaResult},
};
use vaidya_core::traits::CredentialCheck;

use crate::config::{AuthConfig, AuthMode, UserRecord};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const DUPLICATE_EMAIL: &str = "email already registered";

/// Hex SHA-256 digest of `"{email}:{password}"`.
pub fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the credential check selected by `config.mode`.
pub fn from_config(config: &AuthConfig) -> Arc<dyn CredentialCheck> {
    match config.mode {
        AuthMode::AlwaysAllow => Arc::new(AlwaysAllow::new(config.default_capabilities.clone())),
        AuthMode::CredentialStore => Arc::new(CredentialStore::from_config(config.clone())),
    }
}

// ── AlwaysAllow ───────────────────────────────────────────────────────────────

/// Admits everyone as the demo practitioner.
#[derive(Debug, Clone)]
pub struct AlwaysAllow {
    capabilities: Vec<String>,
}

impl AlwaysAllow {
    pub const DEMO_EMAIL: &'static str = "demo@vaidyaconnect.local";
    pub const DEMO_NAME: &'static str = "Demo Practitioner";

    pub fn new(capabilities: Vec<String>) -> Self {
        Self { capabilities }
    }

    fn context(&self, email: &str, name: &str) -> AuthContext {
        AuthContext::new(
            Principal {
                email: email.to_string(),
                name: name.to_string(),
            },
            self.capabilities.iter().cloned().collect::<CapabilitySet>(),
        )
    }
}

impl Default for AlwaysAllow {
    fn default() -> Self {
        Self::new(crate::config::all_capabilities())
    }
}

impl CredentialCheck for AlwaysAllow {
    fn authenticate(&self, _credentials: Option<&Credentials>) -> VaidyaResult<AuthContext> {
        debug!(email = Self::DEMO_EMAIL, "always-allow admitted caller");
        Ok(self.context(Self::DEMO_EMAIL, Self::DEMO_NAME))
    }

    fn register(&self, credentials: &Credentials, name: &str) -> VaidyaResult<AuthContext> {
        Ok(self.context(&credentials.email, name))
    }
}

// ── CredentialStore ───────────────────────────────────────────────────────────

/// Email/password store.
#[derive(Debug)]
pub struct CredentialStore {
    default_capabilities: Vec<String>,
    users: RwLock<Vec<UserRecord>>,
}

impl CredentialStore {
    pub fn from_config(config: AuthConfig) -> Self {
        Self {
            default_capabilities: config.default_capabilities,
            users: RwLock::new(config.users),
        }
    }

    /// Parse the body of an `[auth]` section (top-level `mode`,
    /// `default_capabilities` and `[[users]]`) and build a store.
    ///
    /// Returns `VaidyaError::ConfigError` if the TOML is malformed or has keys
    /// `AuthConfig` does not know, such as an enclosing `[auth]` table.
    pub fn from_toml_str(s: &str) -> VaidyaResult<Self> {
        let config: AuthConfig = toml::from_str(s).map_err(|e| VaidyaError::ConfigError {
            reason: format!("failed to parse auth TOML: {}", e),
        })?;
        Ok(Self::from_config(config))
    }

    /// Every stored user, including ones registered at runtime.
    pub fn users(&self) -> VaidyaResult<Vec<UserRecord>> {
        Ok(self.read()?.clone())
    }

    fn context_for(&self, user: &UserRecord) -> AuthContext {
        let capabilities = if user.capabilities.is_empty() {
            &self.default_capabilities
        } else {
            &user.capabilities
        };
        AuthContext::new(
            Principal {
                email: user.email.clone(),
                name: user.name.clone(),
            },
            capabilities.iter().cloned().collect::<CapabilitySet>(),
        )
    }

    fn read(&self) -> VaidyaResult<std::sync::RwLockReadGuard<'_, Vec<UserRecord>>> {
        self.users.read().map_err(|_| VaidyaError::Unauthorized {
            reason: "credential store lock poisoned".to_string(),
        })
    }
}

impl CredentialCheck for CredentialStore {
    fn authenticate(&self, credentials: Option<&Credentials>) -> VaidyaResult<AuthContext> {
        let Some(credentials) = credentials else {
            warn!("no credentials presented");
            return Err(VaidyaError::Unauthorized {
                reason: "credentials required".to_string(),
            });
        };

        let digest = password_digest(&credentials.email, &credentials.password);
        let users = self.read()?;
        let user = users
            .iter()
            .find(|u| u.email == credentials.email && u.password_sha256 == digest);

        match user {
            Some(user) => {
                info!(email = %user.email, "caller authenticated");
                Ok(self.context_for(user))
            }
            None => {
                warn!(email = %credentials.email, "authentication failed");
                Err(VaidyaError::Unauthorized {
                    reason: INVALID_CREDENTIALS.to_string(),
                })
            }
        }
    }

    fn register(&self, credentials: &Credentials, name: &str) -> VaidyaResult<AuthContext> {
        let mut users = self.users.write().map_err(|_| VaidyaError::Unauthorized {
            reason: "credential store lock poisoned".to_string(),
        })?;

        if users.iter().any(|u| u.email == credentials.email) {
            warn!(email = %credentials.email, "registration rejected: duplicate email");
            return Err(VaidyaError::Unauthorized {
                reason: DUPLICATE_EMAIL.to_string(),
            });
        }

        let user = UserRecord {
            email: credentials.email.clone(),
            name: name.to_string(),
            password_sha256: password_digest(&credentials.email, &credentials.password),
            capabilities: Vec::new(),
        };
        let context = self.context_for(&user);
        users.push(user);

        info!(email = %credentials.email, "user registered");
        Ok(context)
    }
}
