//! The engine handle and the record loaders shared by every operation.

use trail_store::{
    Account, BalanceStore, Ballot, BallotStore, ReceiptStore, Registry, RegistryStore, StoreTxn,
    TrailStore, VoteReceipt,
};
use trail_types::{Clock, Name, SymbolCode, Timestamp};

use crate::{EngineConfig, TrailError};

/// Entry point for every operation.
///
/// The engine holds no state of its own between operations: each call
/// opens a transaction, loads what it needs, validates, writes and commits.
pub struct TrailEngine<S, C> {
    pub(crate) store: S,
    pub(crate) clock: C,
    pub(crate) config: EngineConfig,
}

impl<S: TrailStore, C: Clock> TrailEngine<S, C> {
    pub fn new(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Run `op` inside one store transaction.
    ///
    /// Commits when `op` succeeds; on error the transaction is dropped, so
    /// nothing `op` wrote is persisted.
    pub(crate) fn transact<'s, T>(
        &'s self,
        name: &'static str,
        op: impl FnOnce(&mut S::Txn<'s>) -> Result<T, TrailError>,
    ) -> Result<T, TrailError> {
        let mut txn = self.store.begin()?;
        match op(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(op = name, error = %e, "operation rejected");
                Err(e)
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn registry(&self, code: &SymbolCode) -> Result<Option<Registry>, TrailError> {
        Ok(self.store.begin()?.get_registry(code)?)
    }

    pub fn account(&self, owner: &Name, code: &SymbolCode) -> Result<Option<Account>, TrailError> {
        Ok(self.store.begin()?.get_account(owner, code)?)
    }

    pub fn accounts(&self, owner: &Name) -> Result<Vec<Account>, TrailError> {
        Ok(self.store.begin()?.accounts_of(owner)?)
    }

    pub fn ballot(&self, name: &Name) -> Result<Option<Ballot>, TrailError> {
        Ok(self.store.begin()?.get_ballot(name)?)
    }

    pub fn receipt(&self, voter: &Name, ballot: &Name) -> Result<Option<VoteReceipt>, TrailError> {
        Ok(self.store.begin()?.get_receipt(voter, ballot)?)
    }

    pub fn receipts(&self, voter: &Name) -> Result<Vec<VoteReceipt>, TrailError> {
        Ok(self.store.begin()?.receipts_of(voter)?)
    }
}

// ── Loaders ────────────────────────────────────────────────────────────

pub(crate) fn require_registry<T: RegistryStore>(
    txn: &T,
    code: &SymbolCode,
) -> Result<Registry, TrailError> {
    txn.get_registry(code)?
        .ok_or_else(|| TrailError::NotFound(format!("registry with symbol {code}")))
}

pub(crate) fn require_account<T: BalanceStore>(
    txn: &T,
    owner: &Name,
    code: &SymbolCode,
) -> Result<Account, TrailError> {
    txn.get_account(owner, code)?
        .ok_or_else(|| TrailError::NotFound(format!("{code} balance of {owner}")))
}

pub(crate) fn require_ballot<T: BallotStore>(txn: &T, name: &Name) -> Result<Ballot, TrailError> {
    txn.get_ballot(name)?
        .ok_or_else(|| TrailError::NotFound(format!("ballot {name}")))
}

pub(crate) fn require_publisher(ballot: &Ballot, caller: &Name) -> Result<(), TrailError> {
    if &ballot.publisher == caller {
        Ok(())
    } else {
        Err(TrailError::Unauthorized(format!(
            "only {} may modify ballot {}",
            ballot.publisher, ballot.name
        )))
    }
}
