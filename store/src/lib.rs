//! Records and abstract storage traits for the Trail voting engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The engine depends only on the traits.
//!
//! All access happens inside a [`StoreTxn`] obtained from
//! [`TrailStore::begin`]. Writes become visible only when the transaction
//! is committed; dropping it discards them.

pub mod balance;
pub mod ballot;
pub mod error;
pub mod receipt;
pub mod registry;

pub use balance::{Account, BalanceStore};
pub use ballot::{Ballot, BallotOption, BallotStatus, BallotStore};
pub use error::StoreError;
pub use receipt::{ReceiptStore, VoteReceipt};
pub use registry::{Registry, RegistryStore, TokenSettings};

/// A write transaction spanning every table.
pub trait StoreTxn: RegistryStore + BalanceStore + BallotStore + ReceiptStore {
    /// Atomically publish every write made through this transaction.
    fn commit(self) -> Result<(), StoreError>;
}

/// A backend that hands out serialised write transactions.
pub trait TrailStore {
    type Txn<'a>: StoreTxn
    where
        Self: 'a;

    /// Begin a transaction. Blocks until any other open transaction ends.
    fn begin(&self) -> Result<Self::Txn<'_>, StoreError>;
}
