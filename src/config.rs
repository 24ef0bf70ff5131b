//! Calculator settings loaded from TOML.
//!
//! ```toml
//! max_length = 16
//! require_signature = true
//! confirm_prompt = "Clear all?"
//!
//! [storage]
//! audit_slot = "calculator_audit_log_v1"
//! device_slot = "calculator_device_id"
//! dir = "/var/lib/auditcalc"
//! ```

use crate::audit::AUDIT_SLOT;
use crate::core::MAX_OPERAND_LENGTH;
use crate::identity::DEVICE_SLOT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Cap on user-entered operand length.
    pub max_length: usize,
    /// Gate `=` and clear behind a PIN when an identity is present.
    pub require_signature: bool,
    /// Prompt passed to the confirmation collaborator before clearing.
    pub confirm_prompt: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub audit_slot: String,
    pub device_slot: String,
    /// Directory for file-backed slots; in-memory when absent.
    pub dir: Option<PathBuf>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_length: MAX_OPERAND_LENGTH,
            require_signature: false,
            confirm_prompt: "Clear all?".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audit_slot: AUDIT_SLOT.to_string(),
            device_slot: DEVICE_SLOT.to_string(),
            dir: None,
        }
    }
}

impl CalculatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file. A missing file is `Ok(None)`.
    pub fn try_load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map(Some)
    }

    /// Like [`try_load`](Self::try_load), but logs failures and returns
    /// `None` instead.
    pub fn load(path: &Path) -> Option<Self> {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to load config at {:?}: {}", path, err);
                None
            }
        }
    }
}
