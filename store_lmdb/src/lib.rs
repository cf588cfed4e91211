//! LMDB storage backend for the Trail voting engine.
//!
//! Implements all storage traits from `trail-store` using the `heed` LMDB bindings.
//! Each logical table maps to one LMDB database within a single environment,
//! and every engine operation runs inside one LMDB write transaction.

pub mod balance;
pub mod ballot;
pub mod environment;
pub mod error;
mod keys;
pub mod receipt;
pub mod registry;
pub mod txn;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use txn::LmdbTxn;
