//! Ballot lifecycle: `Setup -> Open -> Closed`.

use trail_store::{Ballot, BallotOption, BallotStatus, BallotStore, TrailStore};
use trail_types::{Asset, Clock, Name, Symbol, Timestamp};

use crate::engine::{require_ballot, require_publisher, require_registry};
use crate::{TrailEngine, TrailError};

/// Arguments of [`TrailEngine::create_ballot`].
#[derive(Clone, Debug)]
pub struct NewBallot {
    pub name: Name,
    pub category: Name,
    pub publisher: Name,
    pub title: String,
    pub description: String,
    pub info_url: String,
    pub max_votable_options: u8,
    pub voting_symbol: Symbol,
}

impl<S: TrailStore, C: Clock> TrailEngine<S, C> {
    /// Create a ballot in `Setup` with no options.
    pub fn create_ballot(&self, new: NewBallot) -> Result<Ballot, TrailError> {
        let ballot = self.transact("create_ballot", |txn| {
            if txn.get_ballot(&new.name)?.is_some() {
                return Err(TrailError::AlreadyExists(format!("ballot {}", new.name)));
            }
            if new.max_votable_options == 0 {
                return Err(TrailError::InvalidArgument(
                    "max_votable_options must be greater than zero".into(),
                ));
            }
            let registry = require_registry(txn, new.voting_symbol.code())?;
            if registry.symbol() != &new.voting_symbol {
                return Err(TrailError::InvalidAmount(format!(
                    "voting symbol {} does not match registered {}",
                    new.voting_symbol,
                    registry.symbol()
                )));
            }
            let ballot = Ballot {
                name: new.name,
                category: new.category,
                publisher: new.publisher,
                title: new.title,
                description: new.description,
                info_url: new.info_url,
                options: Vec::new(),
                unique_voters: 0,
                max_votable_options: new.max_votable_options,
                voting_symbol: new.voting_symbol,
                begin_time: Timestamp::EPOCH,
                end_time: Timestamp::EPOCH,
                status: BallotStatus::Setup,
            };
            txn.put_ballot(&ballot)?;
            Ok(ballot)
        })?;
        tracing::info!(
            ballot = %ballot.name,
            publisher = %ballot.publisher,
            symbol = %ballot.voting_symbol,
            "ballot created"
        );
        Ok(ballot)
    }

    /// Replace a ballot's descriptive fields while it is in `Setup`.
    pub fn set_info(
        &self,
        caller: &Name,
        ballot_name: &Name,
        title: impl Into<String>,
        description: impl Into<String>,
        info_url: impl Into<String>,
    ) -> Result<(), TrailError> {
        let (title, description, info_url) = (title.into(), description.into(), info_url.into());
        self.transact("set_info", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_publisher(&ballot, caller)?;
            require_setup(&ballot)?;
            ballot.title = title;
            ballot.description = description;
            ballot.info_url = info_url;
            txn.put_ballot(&ballot)?;
            Ok(())
        })?;
        tracing::debug!(ballot = %ballot_name, "ballot info updated");
        Ok(())
    }

    /// Append an option with zero weight while the ballot is in `Setup`.
    pub fn add_option(
        &self,
        caller: &Name,
        ballot_name: &Name,
        option: &Name,
        info: impl Into<String>,
    ) -> Result<(), TrailError> {
        let info = info.into();
        self.transact("add_option", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_publisher(&ballot, caller)?;
            require_setup(&ballot)?;
            if ballot.has_option(option) {
                return Err(TrailError::AlreadyExists(format!(
                    "option {option} on ballot {ballot_name}"
                )));
            }
            ballot.options.push(BallotOption {
                name: option.clone(),
                info,
                weight: Asset::zero(ballot.voting_symbol.clone()),
            });
            txn.put_ballot(&ballot)?;
            Ok(())
        })?;
        tracing::info!(ballot = %ballot_name, option = %option, "ballot option added");
        Ok(())
    }

    /// Open a ballot for voting from now until `end_time`.
    pub fn ready(&self, caller: &Name, ballot_name: &Name, end_time: Timestamp) -> Result<(), TrailError> {
        let now = self.now();
        self.transact("ready", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_publisher(&ballot, caller)?;
            require_setup(&ballot)?;
            if ballot.options.len() < 2 {
                return Err(TrailError::InvalidState(format!(
                    "ballot {ballot_name} needs at least 2 options, has {}",
                    ballot.options.len()
                )));
            }
            let earliest = now.plus_secs(self.config.min_ballot_length_secs);
            if end_time < earliest {
                return Err(TrailError::InvalidArgument(format!(
                    "end time {end_time} is before the earliest allowed {earliest}"
                )));
            }
            ballot.begin_time = now;
            ballot.end_time = end_time;
            ballot.status = BallotStatus::Open;
            txn.put_ballot(&ballot)?;
            Ok(())
        })?;
        tracing::info!(ballot = %ballot_name, begin = %now, end = %end_time, "ballot opened");
        Ok(())
    }

    /// Move an `Open` ballot whose end time has passed to `new_status`.
    ///
    /// `Closed` is the only status reachable from `Open`.
    pub fn close_ballot(
        &self,
        caller: &Name,
        ballot_name: &Name,
        new_status: BallotStatus,
    ) -> Result<(), TrailError> {
        let now = self.now();
        self.transact("close_ballot", |txn| {
            let mut ballot = require_ballot(txn, ballot_name)?;
            require_publisher(&ballot, caller)?;
            if new_status != BallotStatus::Closed {
                return Err(TrailError::InvalidArgument(format!(
                    "a ballot cannot be closed into status {new_status}"
                )));
            }
            if ballot.status != BallotStatus::Open {
                return Err(TrailError::InvalidState(format!(
                    "ballot {ballot_name} is {}, not open",
                    ballot.status
                )));
            }
            if !ballot.end_time.has_passed(now) {
                return Err(TrailError::InvalidState(format!(
                    "ballot {ballot_name} runs until {}",
                    ballot.end_time
                )));
            }
            ballot.status = new_status;
            txn.put_ballot(&ballot)?;
            Ok(())
        })?;
        tracing::info!(ballot = %ballot_name, status = %new_status, "ballot closed");
        Ok(())
    }

    /// Remove a ballot that is not currently accepting votes.
    pub fn delete_ballot(&self, caller: &Name, ballot_name: &Name) -> Result<(), TrailError> {
        self.transact("delete_ballot", |txn| {
            let ballot = require_ballot(txn, ballot_name)?;
            require_publisher(&ballot, caller)?;
            if ballot.status == BallotStatus::Open {
                return Err(TrailError::InvalidState(format!(
                    "ballot {ballot_name} is open"
                )));
            }
            txn.delete_ballot(ballot_name)?;
            Ok(())
        })?;
        tracing::info!(ballot = %ballot_name, "ballot deleted");
        Ok(())
    }
}

fn require_setup(ballot: &Ballot) -> Result<(), TrailError> {
    if ballot.status == BallotStatus::Setup {
        Ok(())
    } else {
        Err(TrailError::InvalidState(format!(
            "ballot {} is {}, not in setup",
            ballot.name, ballot.status
        )))
    }
}
