//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use trail_store::{StoreError, TrailStore};

use crate::txn::LmdbTxn;
use crate::LmdbError;

/// Number of named databases the environment holds.
const MAX_DBS: u32 = 5;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    /// `code` → `Registry`
    pub(crate) registries_db: Database<Bytes, Bytes>,
    /// `owner ++ 0x00 ++ code` → `Account`
    pub(crate) balances_db: Database<Bytes, Bytes>,
    /// `ballot` → `Ballot`
    pub(crate) ballots_db: Database<Bytes, Bytes>,
    /// `voter ++ 0x00 ++ ballot` → `VoteReceipt`
    pub(crate) receipts_db: Database<Bytes, Bytes>,
    /// `voter ++ 0x00 ++ code ++ 0x00 ++ expiration_be_u64 ++ ballot` → empty
    pub(crate) expiry_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path
        // and never mapped twice from the same process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let registries_db = env.create_database(&mut wtxn, Some("registries"))?;
        let balances_db = env.create_database(&mut wtxn, Some("balances"))?;
        let ballots_db = env.create_database(&mut wtxn, Some("ballots"))?;
        let receipts_db = env.create_database(&mut wtxn, Some("receipts"))?;
        let expiry_db = env.create_database(&mut wtxn, Some("receipts_by_expiry"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env,
            registries_db,
            balances_db,
            ballots_db,
            receipts_db,
            expiry_db,
        })
    }

    /// Flush the environment to disk.
    pub fn sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }
}

impl TrailStore for LmdbEnvironment {
    type Txn<'a> = LmdbTxn<'a>;

    fn begin(&self) -> Result<LmdbTxn<'_>, StoreError> {
        let txn = self.env.write_txn().map_err(LmdbError::from)?;
        Ok(LmdbTxn::new(txn, self))
    }
}
