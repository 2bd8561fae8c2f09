//! Caller identity and capability types.
//!
//! A facade action only runs for a caller holding an `AuthContext`, and only
//! if that context carries the operation's capability. Contexts are produced
//! by a credential check at the edge and passed explicitly to every action.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability that allows reading the code-translation history.
pub const HISTORY_READ: &str = "history:read";
/// Capability that allows adding to or archiving the code-translation history.
pub const HISTORY_WRITE: &str = "history:write";

/// An opaque capability token, e.g. "ai:translate-term" or "history:write".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability(pub String);

impl Capability {
    /// Construct a capability from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// The set of capabilities granted to a caller.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    inner: HashSet<Capability>,
}

impl CapabilitySet {
    /// Grant a capability to this set.
    pub fn grant(&mut self, capability: Capability) {
        self.inner.insert(capability);
    }

    /// Return true if the set contains the given capability.
    pub fn has(&self, capability: &Capability) -> bool {
        self.inner.contains(capability)
    }

    /// Return an iterator over all granted capabilities.
    pub fn all(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CapabilitySet::default();
        for name in iter {
            set.grant(Capability::new(name));
        }
        set
    }
}

/// Who is calling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    pub name: String,
}

/// Login credentials presented at the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An authenticated caller plus what it may do.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub capabilities: CapabilitySet,
    pub authenticated_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn new(principal: Principal, capabilities: CapabilitySet) -> Self {
        Self {
            principal,
            capabilities,
            authenticated_at: Utc::now(),
        }
    }

    /// Return true if this caller holds the capability named `name`.
    pub fn can(&self, name: &str) -> bool {
        self.capabilities.has(&Capability::new(name))
    }
}
