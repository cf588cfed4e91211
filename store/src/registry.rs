//! Token registry records: one per symbol code.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use trail_types::{Asset, Name, Symbol, SymbolCode};

/// Publisher-chosen behaviour flags, stored with the registry.
///
/// The engine records these verbatim; none of them gates a core operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    #[serde(default)]
    pub is_destructible: bool,
    #[serde(default)]
    pub is_proxyable: bool,
    #[serde(default)]
    pub is_burnable: bool,
    #[serde(default)]
    pub is_seizable: bool,
    #[serde(default)]
    pub is_max_mutable: bool,
    #[serde(default)]
    pub is_transferable: bool,
    #[serde(default)]
    pub is_recastable: bool,
    #[serde(default)]
    pub is_initialized: bool,
    /// Seconds for a counter-balance to decay by one whole token.
    #[serde(default = "default_decay_rate")]
    pub counterbal_decay_rate: u32,
    #[serde(default = "default_true")]
    pub lock_after_initialize: bool,
}

fn default_decay_rate() -> u32 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            is_destructible: false,
            is_proxyable: false,
            is_burnable: false,
            is_seizable: false,
            is_max_mutable: false,
            is_transferable: false,
            is_recastable: false,
            is_initialized: false,
            counterbal_decay_rate: default_decay_rate(),
            lock_after_initialize: default_true(),
        }
    }
}

/// Registration of a token symbol.
///
/// `max_supply` fixes the symbol (code and precision) for the token's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub max_supply: Asset,
    pub supply: Asset,
    /// Number of open balance records for this symbol.
    pub total_voters: u32,
    pub total_proxies: u32,
    pub publisher: Name,
    pub info_url: String,
    pub settings: TokenSettings,
}

impl Registry {
    pub fn symbol(&self) -> &Symbol {
        &self.max_supply.symbol
    }

    pub fn code(&self) -> &SymbolCode {
        self.max_supply.symbol.code()
    }
}

/// Storage for token registries, keyed by symbol code.
pub trait RegistryStore {
    fn get_registry(&self, code: &SymbolCode) -> Result<Option<Registry>, StoreError>;

    /// Insert or replace the registry for `registry.code()`.
    fn put_registry(&mut self, registry: &Registry) -> Result<(), StoreError>;
}
