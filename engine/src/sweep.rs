//! Expired receipt reclamation.

use trail_store::{ReceiptStore, TrailStore};
use trail_types::{Clock, Name, Symbol};

use crate::{TrailEngine, TrailError};

impl<S: TrailStore, C: Clock> TrailEngine<S, C> {
    /// Delete up to `max_count` of `voter`'s receipts in `symbol` whose
    /// expiration has passed, oldest first. Anyone may call this.
    ///
    /// Only the receipts are removed: option tallies, `unique_voters` and
    /// the account's open receipt count keep the swept receipts' share.
    /// Returns the number of receipts removed.
    pub fn sweep(&self, voter: &Name, max_count: usize, symbol: &Symbol) -> Result<usize, TrailError> {
        let now = self.now();
        let removed = self.transact("sweep", |txn| {
            let expired = txn.receipts_expiring_before(voter, symbol.code(), now, max_count)?;
            for receipt in &expired {
                txn.delete_receipt(voter, &receipt.ballot)?;
            }
            Ok(expired.len())
        })?;
        if removed > 0 {
            tracing::info!(voter = %voter, symbol = %symbol, removed, "expired receipts swept");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, NewBallot};
    use trail_nullables::{NullClock, NullStore};
    use trail_store::TokenSettings;
    use trail_types::{Asset, SymbolCode, Timestamp};

    const DAY: u64 = 86_400;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn symbol() -> Symbol {
        "4,VOTE".parse().unwrap()
    }

    /// alice votes on three ballots ending after 2, 3 and 4 days.
    fn setup() -> (TrailEngine<NullStore, NullClock>, NullClock) {
        let clock = NullClock::new(1_000);
        let engine = TrailEngine::new(NullStore::new(), clock.clone(), EngineConfig::default());
        let publisher = name("pub");
        let alice = name("alice");
        engine
            .create_registry(&publisher, "1000.0000 VOTE".parse().unwrap(), TokenSettings::default(), "")
            .unwrap();
        engine.open(&alice, &symbol()).unwrap();
        engine
            .mint(&publisher, &alice, &"10.0000 VOTE".parse::<Asset>().unwrap())
            .unwrap();
        for (ballot, days) in [("b4", 4), ("b2", 2), ("b3", 3)] {
            engine
                .create_ballot(NewBallot {
                    name: name(ballot),
                    category: name("poll"),
                    publisher: publisher.clone(),
                    title: String::new(),
                    description: String::new(),
                    info_url: String::new(),
                    max_votable_options: 1,
                    voting_symbol: symbol(),
                })
                .unwrap();
            engine.add_option(&publisher, &name(ballot), &name("yes"), "").unwrap();
            engine.add_option(&publisher, &name(ballot), &name("no"), "").unwrap();
            engine
                .ready(&publisher, &name(ballot), Timestamp::new(1_000 + days * DAY))
                .unwrap();
            engine.cast(&alice, &name(ballot), &name("yes")).unwrap();
        }
        (engine, clock)
    }

    #[test]
    fn nothing_is_swept_before_expiration() {
        let (engine, clock) = setup();
        clock.set(1_000 + 2 * DAY);
        assert_eq!(engine.sweep(&name("alice"), 10, &symbol()).unwrap(), 0);
        assert_eq!(engine.receipts(&name("alice")).unwrap().len(), 3);
    }

    #[test]
    fn sweeps_oldest_first_up_to_max_count() {
        let (engine, clock) = setup();
        let alice = name("alice");
        clock.set(1_000 + 4 * DAY + 1);

        assert_eq!(engine.sweep(&alice, 2, &symbol()).unwrap(), 2);
        let left: Vec<_> = engine.receipts(&alice).unwrap().into_iter().map(|r| r.ballot).collect();
        assert_eq!(left, vec![name("b4")]);

        assert_eq!(engine.sweep(&alice, 2, &symbol()).unwrap(), 1);
        assert!(engine.receipts(&alice).unwrap().is_empty());
    }

    #[test]
    fn skips_unexpired_receipts() {
        let (engine, clock) = setup();
        clock.set(1_000 + 3 * DAY + 1);
        assert_eq!(engine.sweep(&name("alice"), 10, &symbol()).unwrap(), 2);
        assert!(engine.receipt(&name("alice"), &name("b4")).unwrap().is_some());
    }

    #[test]
    fn sweeping_leaves_tallies_and_counters_untouched() {
        let (engine, clock) = setup();
        let alice = name("alice");
        clock.set(1_000 + 2 * DAY + 1);
        assert_eq!(engine.sweep(&alice, 1, &symbol()).unwrap(), 1);

        let ballot = engine.ballot(&name("b2")).unwrap().unwrap();
        assert_eq!(ballot.option(&name("yes")).unwrap().weight.to_string(), "10.0000 VOTE");
        assert_eq!(ballot.unique_voters, 1);
        let code = SymbolCode::new("VOTE").unwrap();
        assert_eq!(engine.account(&alice, &code).unwrap().unwrap().open_receipts, 3);
    }

    #[test]
    fn other_symbols_are_not_swept() {
        let (engine, clock) = setup();
        clock.set(1_000 + 5 * DAY);
        let other: Symbol = "4,GOV".parse().unwrap();
        assert_eq!(engine.sweep(&name("alice"), 10, &other).unwrap(), 0);
    }
}
