//! Weighted multi-select voting.
//!
//! A voter's first cast on a ballot captures their balance as the receipt's
//! locked weight. Every option the voter selects on that ballot receives the
//! full locked weight; retracting an option removes it again. The receipt
//! disappears with its last selection.

use trail_store::{
    BalanceStore, Ballot, BallotStatus, BallotStore, ReceiptStore, StoreTxn, TrailStore,
    VoteReceipt,
};
use trail_types::{Asset, Clock, Name, Symbol, SymbolCode, Timestamp};

use crate::engine::{require_account, require_ballot, require_registry};
use crate::tally::{add_weight, adjust_option_weight, remove_weight};
use crate::{TrailEngine, TrailError};

impl<S: TrailStore, C: Clock> TrailEngine<S, C> {
    /// Select `option` on `ballot_name` with the voter's weight.
    pub fn cast(&self, voter: &Name, ballot_name: &Name, option: &Name) -> Result<(), TrailError> {
        let now = self.now();
        let weight = self.transact("cast", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_voting_open(&ballot, now)?;
            let existing = current_receipt(txn, voter, &ballot)?;

            let code = ballot.voting_symbol.code().clone();
            let mut account = require_account(txn, voter, &code)?;
            if account.balance.symbol != ballot.voting_symbol {
                return Err(TrailError::InvalidAmount(format!(
                    "balance {} is not in voting symbol {}",
                    account.balance, ballot.voting_symbol
                )));
            }
            if !account.balance.is_positive() {
                return Err(TrailError::InvalidAmount(format!(
                    "{voter} has no {code} to vote with"
                )));
            }
            if account.open_receipts >= self.config.max_vote_receipts {
                return Err(TrailError::LimitExceeded(format!(
                    "{voter} already holds {} open receipts",
                    account.open_receipts
                )));
            }
            if !ballot.has_option(option) {
                return Err(TrailError::NotFound(format!(
                    "option {option} on ballot {ballot_name}"
                )));
            }

            let receipt = match existing {
                Some(mut receipt) => {
                    if receipt.has_selected(option) {
                        return Err(TrailError::AlreadyExists(format!(
                            "{voter} already voted for {option}"
                        )));
                    }
                    if receipt.selections.len() >= usize::from(ballot.max_votable_options) {
                        return Err(TrailError::LimitExceeded(format!(
                            "ballot {ballot_name} allows {} selections",
                            ballot.max_votable_options
                        )));
                    }
                    receipt.selections.push(option.clone());
                    receipt
                }
                None => {
                    ballot.unique_voters = ballot.unique_voters.saturating_add(1);
                    account.open_receipts += 1;
                    txn.put_account(voter, &account)?;
                    VoteReceipt {
                        ballot: ballot_name.clone(),
                        selections: vec![option.clone()],
                        locked_weight: account.balance.clone(),
                        expiration: ballot.end_time,
                    }
                }
            };

            add_weight(&mut ballot, option, &receipt.locked_weight)?;
            txn.put_receipt(voter, &receipt)?;
            txn.put_ballot(&ballot)?;
            Ok(receipt.locked_weight)
        })?;
        tracing::info!(
            voter = %voter,
            ballot = %ballot_name,
            option = %option,
            weight = %weight,
            "vote cast"
        );
        Ok(())
    }

    /// Withdraw the voter's selection of `option` on `ballot_name`.
    pub fn retract(&self, voter: &Name, ballot_name: &Name, option: &Name) -> Result<(), TrailError> {
        let now = self.now();
        let weight = self.transact("retract", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_voting_open(&ballot, now)?;

            let mut receipt = current_receipt(txn, voter, &ballot)?.ok_or_else(|| {
                TrailError::NotFound(format!("receipt of {voter} on ballot {ballot_name}"))
            })?;
            let position = receipt
                .selections
                .iter()
                .position(|s| s == option)
                .ok_or_else(|| {
                    TrailError::NotFound(format!("{voter} has not voted for {option}"))
                })?;

            receipt.selections.remove(position);
            remove_weight(&mut ballot, option, &receipt.locked_weight)?;

            if receipt.selections.is_empty() {
                txn.delete_receipt(voter, ballot_name)?;
                ballot.unique_voters = ballot.unique_voters.saturating_sub(1);
                release_receipt(txn, voter, receipt.code())?;
            } else {
                txn.put_receipt(voter, &receipt)?;
            }
            txn.put_ballot(&ballot)?;
            Ok(receipt.locked_weight)
        })?;
        tracing::info!(
            voter = %voter,
            ballot = %ballot_name,
            option = %option,
            weight = %weight,
            "vote retracted"
        );
        Ok(())
    }

    /// Re-apply `new_balance` as the locked weight of every receipt the
    /// voter holds in `symbol` on a ballot that is still accepting votes.
    ///
    /// Each selected option's tally moves by the difference between the new
    /// and the old locked weight. Receipts on ballots outside their voting
    /// window keep their weight, as do receipts whose ballot is not open,
    /// was deleted or was recreated under the same name. Returns the number
    /// of receipts reweighted.
    pub fn reweight(
        &self,
        voter: &Name,
        symbol: &Symbol,
        new_balance: &Asset,
    ) -> Result<usize, TrailError> {
        let now = self.now();
        let updated = self.transact("reweight", |txn| {
            require_account(txn, voter, symbol.code())?;
            if !new_balance.is_valid() || new_balance.amount < 0 || &new_balance.symbol != symbol {
                return Err(TrailError::InvalidAmount(format!(
                    "new balance {new_balance} must be a valid non-negative {symbol} amount"
                )));
            }
            let registry = require_registry(txn, symbol.code())?;
            if registry.symbol() != symbol || new_balance.amount > registry.max_supply.amount {
                return Err(TrailError::InvalidAmount(format!(
                    "new balance {new_balance} exceeds max supply {}",
                    registry.max_supply
                )));
            }

            let mut updated = 0;
            for mut receipt in txn.receipts_of(voter)? {
                if receipt.locked_weight.symbol != *symbol {
                    continue;
                }
                let Some(mut ballot) = txn.get_ballot(&receipt.ballot)? else {
                    continue;
                };
                if ballot.status != BallotStatus::Open
                    || !ballot.is_within_window(now)
                    || is_stale(&receipt, &ballot)
                {
                    continue;
                }
                let delta = new_balance.checked_sub(&receipt.locked_weight).ok_or_else(|| {
                    TrailError::InvalidAmount(format!(
                        "cannot reweight {} to {new_balance}",
                        receipt.locked_weight
                    ))
                })?;
                if delta.is_zero() {
                    continue;
                }
                for option in &receipt.selections {
                    adjust_option_weight(&mut ballot, option, &delta)?;
                }
                receipt.locked_weight = new_balance.clone();
                txn.put_receipt(voter, &receipt)?;
                txn.put_ballot(&ballot)?;
                updated += 1;
            }
            Ok(updated)
        })?;
        tracing::info!(
            voter = %voter,
            symbol = %symbol,
            balance = %new_balance,
            receipts = updated,
            "receipts reweighted"
        );
        Ok(updated)
    }
}

/// A receipt left behind by a deleted ballot whose name was reused.
fn is_stale(receipt: &VoteReceipt, ballot: &Ballot) -> bool {
    receipt.expiration != ballot.end_time || receipt.locked_weight.symbol != ballot.voting_symbol
}

/// Load the voter's receipt on `ballot`, discarding a stale one.
fn current_receipt<T: StoreTxn>(
    txn: &mut T,
    voter: &Name,
    ballot: &Ballot,
) -> Result<Option<VoteReceipt>, TrailError> {
    let Some(receipt) = txn.get_receipt(voter, &ballot.name)? else {
        return Ok(None);
    };
    if !is_stale(&receipt, ballot) {
        return Ok(Some(receipt));
    }
    txn.delete_receipt(voter, &ballot.name)?;
    release_receipt(txn, voter, receipt.code())?;
    tracing::debug!(
        voter = %voter,
        ballot = %ballot.name,
        expiration = %receipt.expiration,
        "discarded receipt of an earlier ballot"
    );
    Ok(None)
}

/// Give back one of the voter's open receipt slots in `code`.
fn release_receipt<T: BalanceStore>(
    txn: &mut T,
    voter: &Name,
    code: &SymbolCode,
) -> Result<(), TrailError> {
    match txn.get_account(voter, code)? {
        Some(mut account) => {
            account.open_receipts = account.open_receipts.saturating_sub(1);
            txn.put_account(voter, &account)?;
        }
        None => {
            tracing::debug!(voter = %voter, symbol = %code, "no account to release receipt from");
        }
    }
    Ok(())
}

fn require_voting_open(ballot: &Ballot, now: Timestamp) -> Result<(), TrailError> {
    if ballot.status != BallotStatus::Open {
        return Err(TrailError::InvalidState(format!(
            "ballot {} is {}, not open",
            ballot.name, ballot.status
        )));
    }
    if !ballot.is_within_window(now) {
        return Err(TrailError::OutOfWindow(format!(
            "ballot {} accepts votes from {} to {}, now is {now}",
            ballot.name, ballot.begin_time, ballot.end_time
        )));
    }
    Ok(())
}
