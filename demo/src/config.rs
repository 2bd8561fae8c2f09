//! The `vaidya.toml` application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use vaidya_auth::AuthConfig;
use vaidya_contracts::error::{VaidyaError, VaidyaResult};
use vaidya_core::{RetryPolicy, DEFAULT_MAX_CONCURRENT};
use vaidya_transport::ModelConfig;

/// Read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "vaidya.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Transport dispatches allowed in flight at once.
    pub max_concurrent: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vaidya-history.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub retry: RetryPolicy,
    pub limits: LimitsConfig,
    pub auth: AuthConfig,
    pub history: HistoryConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> VaidyaResult<Self> {
        toml::from_str(s).map_err(|e| VaidyaError::ConfigError {
            reason: format!("failed to parse config TOML: {e}"),
        })
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `vaidya.toml` in the
    /// working directory is read if present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> VaidyaResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    info!("no {DEFAULT_CONFIG_PATH} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| VaidyaError::ConfigError {
            reason: format!("cannot read config file '{}': {e}", path.display()),
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
