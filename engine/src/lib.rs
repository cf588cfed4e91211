//! Token-weighted ballot engine for Trail.
//!
//! The engine couples a minimal fungible-token ledger with multi-option
//! ballots whose tallies are weighted by each voter's token balance:
//!
//! - **Token registry and ledger**: register symbols, open/close balances, mint and burn.
//! - **Ballot lifecycle**: `Setup → Open → Closed`, publisher-controlled.
//! - **Vote tracking**: weighted multi-select cast/retract with per-voter receipts.
//! - **Expiration sweep**: permissionless reclamation of expired receipts.
//! - **Reweighting**: re-applies a voter's new balance to their open receipts.
//!
//! Every operation runs inside one storage transaction: it either commits
//! every table it touched or nothing at all.

pub mod ballot;
pub mod config;
pub mod engine;
pub mod error;
pub mod sweep;
pub mod tally;
pub mod token;
pub mod vote;

pub use config::EngineConfig;
pub use engine::TrailEngine;
pub use error::{ErrorKind, TrailError};
pub use ballot::NewBallot;
