//! Nullable store: transactional in-memory storage for testing.
//!
//! A transaction takes the store's lock, works on a private copy of every
//! table and swaps it in on commit. Dropping the transaction releases the
//! lock and discards the copy, which gives the same all-or-nothing contract
//! as the LMDB backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use trail_store::{
    Account, BalanceStore, Ballot, BallotStore, ReceiptStore, Registry, RegistryStore, StoreError,
    StoreTxn, TrailStore, VoteReceipt,
};
use trail_types::{Name, SymbolCode, Timestamp};

#[derive(Clone, Debug, Default)]
struct Tables {
    registries: BTreeMap<SymbolCode, Registry>,
    /// owner → code → account
    balances: BTreeMap<Name, BTreeMap<SymbolCode, Account>>,
    ballots: BTreeMap<Name, Ballot>,
    /// voter → ballot → receipt
    receipts: BTreeMap<Name, BTreeMap<Name, VoteReceipt>>,
    /// (voter, code) → ascending (expiration, ballot)
    expirations: BTreeMap<(Name, SymbolCode), BTreeSet<(Timestamp, Name)>>,
}

/// An in-memory store for testing.
#[derive(Debug, Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrailStore for NullStore {
    type Txn<'a> = NullTxn<'a>;

    fn begin(&self) -> Result<NullTxn<'_>, StoreError> {
        let guard = self
            .tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))?;
        let working = guard.clone();
        Ok(NullTxn { guard, working })
    }
}

/// A transaction over a [`NullStore`].
pub struct NullTxn<'a> {
    guard: MutexGuard<'a, Tables>,
    working: Tables,
}

impl StoreTxn for NullTxn<'_> {
    fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

impl RegistryStore for NullTxn<'_> {
    fn get_registry(&self, code: &SymbolCode) -> Result<Option<Registry>, StoreError> {
        Ok(self.working.registries.get(code).cloned())
    }

    fn put_registry(&mut self, registry: &Registry) -> Result<(), StoreError> {
        self.working
            .registries
            .insert(registry.code().clone(), registry.clone());
        Ok(())
    }
}

impl BalanceStore for NullTxn<'_> {
    fn get_account(&self, owner: &Name, code: &SymbolCode) -> Result<Option<Account>, StoreError> {
        Ok(self
            .working
            .balances
            .get(owner)
            .and_then(|accounts| accounts.get(code))
            .cloned())
    }

    fn put_account(&mut self, owner: &Name, account: &Account) -> Result<(), StoreError> {
        self.working
            .balances
            .entry(owner.clone())
            .or_default()
            .insert(account.code().clone(), account.clone());
        Ok(())
    }

    fn delete_account(&mut self, owner: &Name, code: &SymbolCode) -> Result<(), StoreError> {
        let accounts = self
            .working
            .balances
            .get_mut(owner)
            .ok_or_else(|| StoreError::NotFound(format!("account {owner}/{code}")))?;
        accounts
            .remove(code)
            .ok_or_else(|| StoreError::NotFound(format!("account {owner}/{code}")))?;
        if accounts.is_empty() {
            self.working.balances.remove(owner);
        }
        Ok(())
    }

    fn accounts_of(&self, owner: &Name) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .working
            .balances
            .get(owner)
            .map(|accounts| accounts.values().cloned().collect())
            .unwrap_or_default())
    }
}

impl BallotStore for NullTxn<'_> {
    fn get_ballot(&self, name: &Name) -> Result<Option<Ballot>, StoreError> {
        Ok(self.working.ballots.get(name).cloned())
    }

    fn put_ballot(&mut self, ballot: &Ballot) -> Result<(), StoreError> {
        self.working
            .ballots
            .insert(ballot.name.clone(), ballot.clone());
        Ok(())
    }

    fn delete_ballot(&mut self, name: &Name) -> Result<(), StoreError> {
        self.working
            .ballots
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("ballot {name}")))
    }
}

impl NullTxn<'_> {
    fn unindex(&mut self, voter: &Name, receipt: &VoteReceipt) {
        let key = (voter.clone(), receipt.code().clone());
        if let Some(index) = self.working.expirations.get_mut(&key) {
            index.remove(&(receipt.expiration, receipt.ballot.clone()));
            if index.is_empty() {
                self.working.expirations.remove(&key);
            }
        }
    }
}

impl ReceiptStore for NullTxn<'_> {
    fn get_receipt(&self, voter: &Name, ballot: &Name) -> Result<Option<VoteReceipt>, StoreError> {
        Ok(self
            .working
            .receipts
            .get(voter)
            .and_then(|receipts| receipts.get(ballot))
            .cloned())
    }

    fn put_receipt(&mut self, voter: &Name, receipt: &VoteReceipt) -> Result<(), StoreError> {
        let previous = self
            .working
            .receipts
            .entry(voter.clone())
            .or_default()
            .insert(receipt.ballot.clone(), receipt.clone());
        if let Some(previous) = previous {
            self.unindex(voter, &previous);
        }
        self.working
            .expirations
            .entry((voter.clone(), receipt.code().clone()))
            .or_default()
            .insert((receipt.expiration, receipt.ballot.clone()));
        Ok(())
    }

    fn delete_receipt(&mut self, voter: &Name, ballot: &Name) -> Result<(), StoreError> {
        let receipts = self
            .working
            .receipts
            .get_mut(voter)
            .ok_or_else(|| StoreError::NotFound(format!("receipt {voter}/{ballot}")))?;
        let removed = receipts
            .remove(ballot)
            .ok_or_else(|| StoreError::NotFound(format!("receipt {voter}/{ballot}")))?;
        if receipts.is_empty() {
            self.working.receipts.remove(voter);
        }
        self.unindex(voter, &removed);
        Ok(())
    }

    fn receipts_of(&self, voter: &Name) -> Result<Vec<VoteReceipt>, StoreError> {
        Ok(self
            .working
            .receipts
            .get(voter)
            .map(|receipts| receipts.values().cloned().collect())
            .unwrap_or_default())
    }

    fn receipts_expiring_before(
        &self,
        voter: &Name,
        code: &SymbolCode,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<VoteReceipt>, StoreError> {
        let Some(index) = self.working.expirations.get(&(voter.clone(), code.clone())) else {
            return Ok(Vec::new());
        };
        index
            .iter()
            .take_while(|(expiration, _)| *expiration < cutoff)
            .take(limit)
            .map(|(_, ballot)| {
                self.get_receipt(voter, ballot)?.ok_or_else(|| {
                    StoreError::Corruption(format!("index entry without receipt {voter}/{ballot}"))
                })
            })
            .collect()
    }
}
