//! A single LMDB write transaction spanning every Trail table.
//!
//! If the transaction is dropped without calling [`StoreTxn::commit`], all
//! writes are rolled back (the underlying LMDB transaction is aborted).

use std::ops::Bound;

use heed::types::Bytes;
use heed::{Database, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use trail_store::{StoreError, StoreTxn};

use crate::environment::LmdbEnvironment;
use crate::keys::increment_prefix;
use crate::LmdbError;

pub struct LmdbTxn<'a> {
    pub(crate) txn: RwTxn<'a>,
    pub(crate) env: &'a LmdbEnvironment,
}

impl<'a> LmdbTxn<'a> {
    pub(crate) fn new(txn: RwTxn<'a>, env: &'a LmdbEnvironment) -> Self {
        Self { txn, env }
    }

    /// Read and decode a record.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        match db.get(&self.txn, key).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a record.
    pub(crate) fn put_record<T: Serialize>(
        &mut self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(value).map_err(LmdbError::from)?;
        db.put(&mut self.txn, key, &bytes).map_err(LmdbError::from)?;
        Ok(())
    }

    /// Delete a key, failing with `NotFound` when it is absent.
    pub(crate) fn delete_key(
        &mut self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        what: impl FnOnce() -> String,
    ) -> Result<(), StoreError> {
        if db.delete(&mut self.txn, key).map_err(LmdbError::from)? {
            Ok(())
        } else {
            Err(StoreError::NotFound(what()))
        }
    }

    /// Decode every value whose key starts with `prefix`, in key order.
    pub(crate) fn scan_prefix<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        prefix: &[u8],
    ) -> Result<Vec<T>, StoreError> {
        let mut upper = prefix.to_vec();
        increment_prefix(&mut upper);
        let bounds = (Bound::Included(prefix), Bound::Excluded(upper.as_slice()));
        let iter = db.range(&self.txn, &bounds).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}

impl StoreTxn for LmdbTxn<'_> {
    fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
