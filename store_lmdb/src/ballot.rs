//! LMDB implementation of BallotStore.

use trail_store::{Ballot, BallotStore, StoreError};
use trail_types::Name;

use crate::txn::LmdbTxn;

impl BallotStore for LmdbTxn<'_> {
    fn get_ballot(&self, name: &Name) -> Result<Option<Ballot>, StoreError> {
        self.get_record(self.env.ballots_db, name.as_bytes())
    }

    fn put_ballot(&mut self, ballot: &Ballot) -> Result<(), StoreError> {
        let db = self.env.ballots_db;
        self.put_record(db, ballot.name.as_bytes(), ballot)
    }

    fn delete_ballot(&mut self, name: &Name) -> Result<(), StoreError> {
        let db = self.env.ballots_db;
        self.delete_key(db, name.as_bytes(), || format!("ballot {name}"))
    }
}
