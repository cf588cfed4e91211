//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::TrailError;

/// Tunable limits of the engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum distance between `ready` and the ballot's end time.
    #[serde(default = "default_min_ballot_length_secs")]
    pub min_ballot_length_secs: u64,

    /// Maximum number of open vote receipts per account.
    #[serde(default = "default_max_vote_receipts")]
    pub max_vote_receipts: u16,

    /// Symbol codes that may not be registered.
    #[serde(default = "default_reserved_symbols")]
    pub reserved_symbols: Vec<String>,

    /// Maximum memo length accepted by `send`, in bytes.
    #[serde(default = "default_max_memo_bytes")]
    pub max_memo_bytes: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_ballot_length_secs() -> u64 {
    86_400
}

fn default_max_vote_receipts() -> u16 {
    51
}

fn default_reserved_symbols() -> Vec<String> {
    vec!["TLOS".to_string()]
}

fn default_max_memo_bytes() -> usize {
    256
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, TrailError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrailError::InvalidArgument(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TrailError> {
        toml::from_str(s).map_err(|e| TrailError::InvalidArgument(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TrailError> {
        toml::to_string_pretty(self).map_err(|e| TrailError::InvalidArgument(e.to_string()))
    }

    pub fn is_reserved(&self, code: &str) -> bool {
        self.reserved_symbols.iter().any(|s| s == code)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_ballot_length_secs: default_min_ballot_length_secs(),
            max_vote_receipts: default_max_vote_receipts(),
            reserved_symbols: default_reserved_symbols(),
            max_memo_bytes: default_max_memo_bytes(),
        }
    }
}
