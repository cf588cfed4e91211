//! The single routine through which option tallies change.
//!
//! Every mutator that touches an option's weight (cast, retract, reweight)
//! goes through [`adjust_option_weight`], so the tally of each option stays
//! equal to the sum of the locked weights of the receipts selecting it.

use trail_store::Ballot;
use trail_types::{Asset, Name};

use crate::TrailError;

/// Add `delta` (possibly negative) to the tallied weight of `option`.
///
/// The ballot is left untouched on error. A tally that would drop below
/// zero means the receipts and the tally have already diverged and is
/// reported as [`TrailError::Corrupted`].
pub fn adjust_option_weight(
    ballot: &mut Ballot,
    option: &Name,
    delta: &Asset,
) -> Result<(), TrailError> {
    if delta.symbol != ballot.voting_symbol {
        return Err(TrailError::InvalidAmount(format!(
            "weight {delta} does not match voting symbol {} of ballot {}",
            ballot.voting_symbol, ballot.name
        )));
    }
    let ballot_name = ballot.name.clone();
    let entry = ballot
        .options
        .iter_mut()
        .find(|o| &o.name == option)
        .ok_or_else(|| TrailError::NotFound(format!("option {option} on ballot {ballot_name}")))?;

    let updated = entry.weight.checked_add(delta).ok_or_else(|| {
        TrailError::InvalidAmount(format!("tally of {option} overflows adding {delta}"))
    })?;
    if updated.amount < 0 {
        return Err(TrailError::Corrupted(format!(
            "tally of {option} on ballot {ballot_name} would become {updated}"
        )));
    }
    entry.weight = updated;
    Ok(())
}

/// Credit `weight` to `option`.
pub fn add_weight(ballot: &mut Ballot, option: &Name, weight: &Asset) -> Result<(), TrailError> {
    adjust_option_weight(ballot, option, weight)
}

/// Debit `weight` from `option`.
pub fn remove_weight(ballot: &mut Ballot, option: &Name, weight: &Asset) -> Result<(), TrailError> {
    adjust_option_weight(ballot, option, &negate(weight))
}

pub(crate) fn negate(asset: &Asset) -> Asset {
    Asset::new(-asset.amount, asset.symbol.clone())
}
