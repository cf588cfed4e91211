//! LMDB implementation of BalanceStore.

use trail_store::{Account, BalanceStore, StoreError};
use trail_types::{Name, SymbolCode};

use crate::keys::{balance_key, owner_prefix};
use crate::txn::LmdbTxn;

impl BalanceStore for LmdbTxn<'_> {
    fn get_account(&self, owner: &Name, code: &SymbolCode) -> Result<Option<Account>, StoreError> {
        self.get_record(self.env.balances_db, &balance_key(owner, code))
    }

    fn put_account(&mut self, owner: &Name, account: &Account) -> Result<(), StoreError> {
        let db = self.env.balances_db;
        self.put_record(db, &balance_key(owner, account.code()), account)
    }

    fn delete_account(&mut self, owner: &Name, code: &SymbolCode) -> Result<(), StoreError> {
        let db = self.env.balances_db;
        self.delete_key(db, &balance_key(owner, code), || {
            format!("account {owner}/{code}")
        })
    }

    fn accounts_of(&self, owner: &Name) -> Result<Vec<Account>, StoreError> {
        self.scan_prefix(self.env.balances_db, &owner_prefix(owner))
    }
}
