//! Vote receipts and the expiration-ordered index over them.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use trail_types::{Asset, Name, SymbolCode, Timestamp};

/// A voter's standing selections on one ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub ballot: Name,
    /// Selected options in the order they were cast.
    pub selections: Vec<Name>,
    /// Weight applied to every selected option. Its symbol is the ballot's
    /// voting symbol at the time of the first cast.
    pub locked_weight: Asset,
    /// The ballot's end time at the time of the first cast.
    pub expiration: Timestamp,
}

impl VoteReceipt {
    pub fn has_selected(&self, option: &Name) -> bool {
        self.selections.contains(option)
    }

    /// Code of the symbol this receipt's weight is denominated in.
    pub fn code(&self) -> &SymbolCode {
        self.locked_weight.symbol.code()
    }
}

/// Storage for receipts, keyed by `(voter, ballot)`, plus a secondary
/// index per `(voter, symbol code)` ordered by `(expiration, ballot)`.
///
/// Implementations keep the index in step with the primary table: `put`
/// moves the index entry when a receipt's expiration changes and `delete`
/// removes it.
pub trait ReceiptStore {
    fn get_receipt(&self, voter: &Name, ballot: &Name) -> Result<Option<VoteReceipt>, StoreError>;

    /// Insert or replace `voter`'s receipt for `receipt.ballot`.
    fn put_receipt(&mut self, voter: &Name, receipt: &VoteReceipt) -> Result<(), StoreError>;

    /// Remove a receipt and its index entry. Fails with `NotFound` if absent.
    fn delete_receipt(&mut self, voter: &Name, ballot: &Name) -> Result<(), StoreError>;

    /// Every receipt held by `voter`, ordered by ballot name.
    fn receipts_of(&self, voter: &Name) -> Result<Vec<VoteReceipt>, StoreError>;

    /// Up to `limit` of `voter`'s receipts denominated in `code` whose
    /// expiration is strictly before `cutoff`, ascending by expiration.
    fn receipts_expiring_before(
        &self,
        voter: &Name,
        code: &SymbolCode,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<VoteReceipt>, StoreError>;
}
