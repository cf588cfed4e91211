//! Ballot records and their embedded options.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trail_types::{Asset, Name, Symbol, Timestamp};

/// Ballot lifecycle phase. Transitions only move forward:
/// `Setup -> Open -> Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotStatus {
    /// Publisher is still editing info and options.
    Setup,
    /// Accepting votes between `begin_time` and `end_time`.
    Open,
    /// Voting finished; tallies are final.
    Closed,
}

impl BallotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<u8> for BallotStatus {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Setup),
            1 => Ok(Self::Open),
            2 => Ok(Self::Closed),
            other => Err(other),
        }
    }
}

impl FromStr for BallotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "setup" | "0" => Ok(Self::Setup),
            "open" | "1" => Ok(Self::Open),
            "closed" | "2" => Ok(Self::Closed),
            other => Err(format!("unknown ballot status '{other}'")),
        }
    }
}

impl fmt::Display for BallotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A choice on a ballot with its tallied weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotOption {
    pub name: Name,
    pub info: String,
    /// Sum of the locked weight of every active receipt selecting this option.
    pub weight: Asset,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub name: Name,
    pub category: Name,
    pub publisher: Name,
    pub title: String,
    pub description: String,
    pub info_url: String,
    /// Options in insertion order.
    pub options: Vec<BallotOption>,
    pub unique_voters: u32,
    pub max_votable_options: u8,
    pub voting_symbol: Symbol,
    /// Zero until the ballot is readied.
    pub begin_time: Timestamp,
    /// Zero until the ballot is readied.
    pub end_time: Timestamp,
    pub status: BallotStatus,
}

impl Ballot {
    pub fn option_index(&self, option: &Name) -> Option<usize> {
        self.options.iter().position(|o| &o.name == option)
    }

    pub fn has_option(&self, option: &Name) -> bool {
        self.option_index(option).is_some()
    }

    pub fn option(&self, option: &Name) -> Option<&BallotOption> {
        self.options.iter().find(|o| &o.name == option)
    }

    /// Whether `now` falls inside the inclusive voting window.
    pub fn is_within_window(&self, now: Timestamp) -> bool {
        now >= self.begin_time && now <= self.end_time
    }
}

/// Storage for ballots, keyed by ballot name.
pub trait BallotStore {
    fn get_ballot(&self, name: &Name) -> Result<Option<Ballot>, StoreError>;

    /// Insert or replace the ballot named `ballot.name`.
    fn put_ballot(&mut self, ballot: &Ballot) -> Result<(), StoreError>;

    /// Remove a ballot. Fails with `NotFound` if it does not exist.
    fn delete_ballot(&mut self, name: &Name) -> Result<(), StoreError>;
}
