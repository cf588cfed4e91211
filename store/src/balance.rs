//! Per-owner token balances.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use trail_types::{Asset, Name, SymbolCode};

/// One owner's holding of one symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: Asset,
    /// Vote receipts currently counted against this account.
    pub open_receipts: u16,
}

impl Account {
    pub fn code(&self) -> &SymbolCode {
        self.balance.symbol.code()
    }
}

/// Storage for balances, keyed by `(owner, symbol code)`.
pub trait BalanceStore {
    fn get_account(&self, owner: &Name, code: &SymbolCode) -> Result<Option<Account>, StoreError>;

    /// Insert or replace `owner`'s account for `account.code()`.
    fn put_account(&mut self, owner: &Name, account: &Account) -> Result<(), StoreError>;

    /// Remove an account. Fails with `NotFound` if it does not exist.
    fn delete_account(&mut self, owner: &Name, code: &SymbolCode) -> Result<(), StoreError>;

    /// Every account held by `owner`, ordered by symbol code.
    fn accounts_of(&self, owner: &Name) -> Result<Vec<Account>, StoreError>;
}
