//! LMDB implementation of ReceiptStore.
//!
//! Two databases:
//! - `receipts_db`: `voter ++ 0x00 ++ ballot` → bincode `VoteReceipt`.
//! - `expiry_db`: `voter ++ 0x00 ++ code ++ 0x00 ++ expiration_be_u64 ++ ballot` → empty.
//!   Big-endian expirations sort lexicographically by time, so a bounded
//!   range scan over one `(voter, code)` prefix yields receipts oldest first.

use std::ops::Bound;

use trail_store::{ReceiptStore, StoreError, VoteReceipt};
use trail_types::{Name, SymbolCode, Timestamp};

use crate::keys::{ballot_from_expiry_key, expiry_key, expiry_prefix, owner_prefix, receipt_key};
use crate::txn::LmdbTxn;
use crate::LmdbError;

impl LmdbTxn<'_> {
    fn index_key(voter: &Name, receipt: &VoteReceipt) -> Vec<u8> {
        expiry_key(voter, receipt.code(), receipt.expiration, &receipt.ballot)
    }
}

impl ReceiptStore for LmdbTxn<'_> {
    fn get_receipt(&self, voter: &Name, ballot: &Name) -> Result<Option<VoteReceipt>, StoreError> {
        self.get_record(self.env.receipts_db, &receipt_key(voter, ballot))
    }

    fn put_receipt(&mut self, voter: &Name, receipt: &VoteReceipt) -> Result<(), StoreError> {
        let receipts_db = self.env.receipts_db;
        let expiry_db = self.env.expiry_db;

        let new_index = Self::index_key(voter, receipt);
        if let Some(previous) = self.get_receipt(voter, &receipt.ballot)? {
            let old_index = Self::index_key(voter, &previous);
            if old_index != new_index {
                expiry_db
                    .delete(&mut self.txn, &old_index)
                    .map_err(LmdbError::from)?;
            }
        }

        self.put_record(receipts_db, &receipt_key(voter, &receipt.ballot), receipt)?;
        expiry_db
            .put(&mut self.txn, &new_index, &[])
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_receipt(&mut self, voter: &Name, ballot: &Name) -> Result<(), StoreError> {
        let receipt = self
            .get_receipt(voter, ballot)?
            .ok_or_else(|| StoreError::NotFound(format!("receipt {voter}/{ballot}")))?;
        let receipts_db = self.env.receipts_db;
        let expiry_db = self.env.expiry_db;

        receipts_db
            .delete(&mut self.txn, &receipt_key(voter, ballot))
            .map_err(LmdbError::from)?;
        let index = Self::index_key(voter, &receipt);
        if !expiry_db
            .delete(&mut self.txn, &index)
            .map_err(LmdbError::from)?
        {
            tracing::warn!(%voter, %ballot, "receipt had no expiration index entry");
        }
        Ok(())
    }

    fn receipts_of(&self, voter: &Name) -> Result<Vec<VoteReceipt>, StoreError> {
        self.scan_prefix(self.env.receipts_db, &owner_prefix(voter))
    }

    fn receipts_expiring_before(
        &self,
        voter: &Name,
        code: &SymbolCode,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<VoteReceipt>, StoreError> {
        let prefix = expiry_prefix(voter, code);
        let mut upper = prefix.clone();
        upper.extend_from_slice(&cutoff.as_secs().to_be_bytes());
        let bounds = (
            Bound::Included(prefix.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );

        let iter = self
            .env
            .expiry_db
            .range(&self.txn, &bounds)
            .map_err(LmdbError::from)?;
        let mut ballots = Vec::new();
        for entry in iter.take(limit) {
            let (key, _) = entry.map_err(LmdbError::from)?;
            ballots.push(ballot_from_expiry_key(&prefix, key)?);
        }

        ballots
            .iter()
            .map(|ballot| {
                self.get_receipt(voter, ballot)?.ok_or_else(|| {
                    StoreError::Corruption(format!("index entry without receipt {voter}/{ballot}"))
                })
            })
            .collect()
    }
}
