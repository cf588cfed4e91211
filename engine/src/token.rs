//! Token registry and balance ledger operations.

use trail_store::{Account, BalanceStore, Registry, RegistryStore, TokenSettings, TrailStore};
use trail_types::{Asset, Clock, Name, Symbol};

use crate::engine::{require_account, require_registry};
use crate::{TrailEngine, TrailError};

impl<S: TrailStore, C: Clock> TrailEngine<S, C> {
    /// Register a new token symbol. `max_supply` fixes code and precision.
    pub fn create_registry(
        &self,
        publisher: &Name,
        max_supply: Asset,
        settings: TokenSettings,
        info_url: impl Into<String>,
    ) -> Result<Registry, TrailError> {
        let info_url = info_url.into();
        let registry = self.transact("create_registry", |txn| {
            if !max_supply.is_valid() || !max_supply.is_positive() {
                return Err(TrailError::InvalidAmount(format!(
                    "max supply {max_supply} must be valid and positive"
                )));
            }
            let code = max_supply.symbol.code();
            if self.config.is_reserved(code.as_str()) {
                return Err(TrailError::InvalidAmount(format!(
                    "symbol {code} is reserved"
                )));
            }
            if txn.get_registry(code)?.is_some() {
                return Err(TrailError::AlreadyExists(format!("registry {code}")));
            }
            let registry = Registry {
                supply: Asset::zero(max_supply.symbol.clone()),
                max_supply: max_supply.clone(),
                total_voters: 0,
                total_proxies: 0,
                publisher: publisher.clone(),
                info_url,
                settings,
            };
            txn.put_registry(&registry)?;
            Ok(registry)
        })?;
        tracing::info!(
            symbol = %registry.symbol(),
            max_supply = %registry.max_supply,
            publisher = %publisher,
            "token registry created"
        );
        Ok(registry)
    }

    /// Issue new tokens to an account that is already open.
    pub fn mint(&self, publisher: &Name, recipient: &Name, amount: &Asset) -> Result<(), TrailError> {
        let supply = self.transact("mint", |txn| {
            let mut registry = require_registry(txn, amount.symbol.code())?;
            require_registry_publisher(&registry, publisher)?;
            require_transferable_amount(&registry, amount)?;

            let supply = registry
                .supply
                .checked_add(amount)
                .filter(|s| *s <= registry.max_supply)
                .ok_or_else(|| {
                    TrailError::InvalidAmount(format!(
                        "minting {amount} would exceed max supply {}",
                        registry.max_supply
                    ))
                })?;
            let mut account = require_account(txn, recipient, amount.symbol.code())?;
            account.balance = account.balance.checked_add(amount).ok_or_else(|| {
                TrailError::InvalidAmount(format!("balance of {recipient} overflows"))
            })?;

            registry.supply = supply;
            txn.put_account(recipient, &account)?;
            txn.put_registry(&registry)?;
            Ok(registry.supply)
        })?;
        tracing::info!(recipient = %recipient, amount = %amount, supply = %supply, "tokens minted");
        Ok(())
    }

    /// Destroy tokens held by the publisher's own account.
    pub fn burn(&self, publisher: &Name, amount: &Asset) -> Result<(), TrailError> {
        let supply = self.transact("burn", |txn| {
            let mut registry = require_registry(txn, amount.symbol.code())?;
            require_registry_publisher(&registry, publisher)?;
            require_transferable_amount(&registry, amount)?;

            let supply = registry
                .supply
                .checked_sub(amount)
                .filter(|s| s.amount >= 0)
                .ok_or_else(|| {
                    TrailError::InvalidAmount(format!(
                        "burning {amount} exceeds supply {}",
                        registry.supply
                    ))
                })?;
            let mut account = require_account(txn, publisher, amount.symbol.code())?;
            account.balance = account
                .balance
                .checked_sub(amount)
                .filter(|b| b.amount >= 0)
                .ok_or_else(|| {
                    TrailError::InvalidAmount(format!(
                        "burning {amount} exceeds balance {}",
                        account.balance
                    ))
                })?;

            registry.supply = supply;
            txn.put_account(publisher, &account)?;
            txn.put_registry(&registry)?;
            Ok(registry.supply)
        })?;
        tracing::info!(publisher = %publisher, amount = %amount, supply = %supply, "tokens burned");
        Ok(())
    }

    /// Open a zero balance for `owner` in a registered symbol.
    pub fn open(&self, owner: &Name, symbol: &Symbol) -> Result<(), TrailError> {
        self.transact("open", |txn| {
            let mut registry = require_registry(txn, symbol.code())?;
            if registry.symbol() != symbol {
                return Err(TrailError::InvalidAmount(format!(
                    "symbol {symbol} does not match registered {}",
                    registry.symbol()
                )));
            }
            if txn.get_account(owner, symbol.code())?.is_some() {
                return Err(TrailError::AlreadyExists(format!(
                    "{} balance of {owner}",
                    symbol.code()
                )));
            }
            let account = Account {
                balance: Asset::zero(symbol.clone()),
                open_receipts: 0,
            };
            registry.total_voters = registry.total_voters.saturating_add(1);
            txn.put_account(owner, &account)?;
            txn.put_registry(&registry)?;
            Ok(())
        })?;
        tracing::info!(owner = %owner, symbol = %symbol, "balance opened");
        Ok(())
    }

    /// Delete `owner`'s balance record. Only an exactly-zero balance may close.
    pub fn close(&self, owner: &Name, symbol: &Symbol) -> Result<(), TrailError> {
        self.transact("close", |txn| {
            let account = require_account(txn, owner, symbol.code())?;
            if !account.balance.is_zero() {
                return Err(TrailError::InvalidAmount(format!(
                    "cannot close non-zero balance {}",
                    account.balance
                )));
            }
            txn.delete_account(owner, symbol.code())?;
            if let Some(mut registry) = txn.get_registry(symbol.code())? {
                registry.total_voters = registry.total_voters.saturating_sub(1);
                txn.put_registry(&registry)?;
            }
            Ok(())
        })?;
        tracing::info!(owner = %owner, symbol = %symbol, "balance closed");
        Ok(())
    }

    /// Validate a transfer. Balance movement is not supported, so a request
    /// that passes every check is answered with [`TrailError::Unsupported`].
    pub fn send(
        &self,
        sender: &Name,
        recipient: &Name,
        amount: &Asset,
        memo: &str,
    ) -> Result<(), TrailError> {
        self.transact("send", |txn| {
            let registry = require_registry(txn, amount.symbol.code())?;
            if sender == recipient {
                return Err(TrailError::InvalidArgument(format!(
                    "{sender} cannot send to itself"
                )));
            }
            require_transferable_amount(&registry, amount)?;
            if memo.len() > self.config.max_memo_bytes {
                return Err(TrailError::InvalidArgument(format!(
                    "memo is {} bytes, limit is {}",
                    memo.len(),
                    self.config.max_memo_bytes
                )));
            }
            Err(TrailError::Unsupported("token transfers".into()))
        })
    }

    /// Validate a seizure by the registry publisher. Answered with
    /// [`TrailError::Unsupported`] once every check passes.
    pub fn seize(&self, publisher: &Name, owner: &Name, amount: &Asset) -> Result<(), TrailError> {
        self.transact("seize", |txn| {
            let registry = require_registry(txn, amount.symbol.code())?;
            require_registry_publisher(&registry, publisher)?;
            if publisher == owner {
                return Err(TrailError::InvalidArgument(format!(
                    "{publisher} cannot seize from itself"
                )));
            }
            require_transferable_amount(&registry, amount)?;
            Err(TrailError::Unsupported("token seizure".into()))
        })
    }
}

fn require_registry_publisher(registry: &Registry, caller: &Name) -> Result<(), TrailError> {
    if &registry.publisher == caller {
        Ok(())
    } else {
        Err(TrailError::Unauthorized(format!(
            "only {} may manage {}",
            registry.publisher,
            registry.code()
        )))
    }
}

/// A well-formed, positive amount of exactly the registry's symbol.
fn require_transferable_amount(registry: &Registry, amount: &Asset) -> Result<(), TrailError> {
    if !amount.is_valid() || !amount.is_positive() {
        return Err(TrailError::InvalidAmount(format!(
            "amount {amount} must be valid and positive"
        )));
    }
    if &amount.symbol != registry.symbol() {
        return Err(TrailError::InvalidAmount(format!(
            "amount {amount} does not match registered symbol {}",
            registry.symbol()
        )));
    }
    Ok(())
}
