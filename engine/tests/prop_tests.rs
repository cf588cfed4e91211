use proptest::prelude::*;

use trail_engine::{EngineConfig, NewBallot, TrailEngine};
use trail_nullables::{NullClock, NullStore};
use trail_store::{BallotStatus, TokenSettings};
use trail_types::{Asset, Name, Symbol, SymbolCode, Timestamp};

const NOW: u64 = 1_000_000;
const DAY: u64 = 86_400;
const VOTERS: [&str; 3] = ["alice", "bob", "carol"];
const BALLOTS: [&str; 2] = ["b1", "b2"];
const OPTIONS: [&str; 3] = ["yes", "no", "maybe"];
const MAX_RECEIPTS: u16 = 1;

type Engine = TrailEngine<NullStore, NullClock>;

#[derive(Clone, Debug)]
enum Op {
    Mint(usize, i64),
    Burn(i64),
    Cast(usize, usize, usize),
    Retract(usize, usize, usize),
    Reweight(usize, i64),
    Advance(u64),
    Close(usize),
    Sweep(usize, usize),
}

fn arb_op(with_sweep: bool) -> BoxedStrategy<Op> {
    let voter = 0..VOTERS.len();
    let ballot = 0..BALLOTS.len();
    let option = 0..OPTIONS.len();
    let core = prop_oneof![
        3 => (voter.clone(), 0i64..5_000_000).prop_map(|(v, a)| Op::Mint(v, a)),
        1 => (0i64..2_000_000).prop_map(Op::Burn),
        6 => (voter.clone(), ballot.clone(), option.clone()).prop_map(|(v, b, o)| Op::Cast(v, b, o)),
        3 => (voter.clone(), ballot.clone(), option).prop_map(|(v, b, o)| Op::Retract(v, b, o)),
        2 => (voter.clone(), 0i64..5_000_000).prop_map(|(v, a)| Op::Reweight(v, a)),
        1 => (0u64..DAY).prop_map(Op::Advance),
        1 => ballot.prop_map(Op::Close),
    ];
    if with_sweep {
        prop_oneof![
            16 => core,
            1 => (voter, 1usize..4).prop_map(|(v, n)| Op::Sweep(v, n)),
        ]
        .boxed()
    } else {
        core.boxed()
    }
}

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

fn symbol() -> Symbol {
    "4,VOTE".parse().unwrap()
}

fn code() -> SymbolCode {
    SymbolCode::new("VOTE").unwrap()
}

fn amount(raw: i64) -> Asset {
    Asset::new(raw, symbol())
}

fn world(max_vote_receipts: u16) -> (Engine, NullClock) {
    let clock = NullClock::new(NOW);
    let config = EngineConfig {
        max_vote_receipts,
        ..EngineConfig::default()
    };
    let engine = TrailEngine::new(NullStore::new(), clock.clone(), config);
    let publisher = name("pub");
    engine
        .create_registry(&publisher, amount(10_000_000), TokenSettings::default(), "")
        .unwrap();
    engine.open(&publisher, &symbol()).unwrap();
    for voter in VOTERS {
        engine.open(&name(voter), &symbol()).unwrap();
    }
    for (i, ballot) in BALLOTS.iter().enumerate() {
        engine
            .create_ballot(NewBallot {
                name: name(ballot),
                category: name("poll"),
                publisher: publisher.clone(),
                title: String::new(),
                description: String::new(),
                info_url: String::new(),
                max_votable_options: 2,
                voting_symbol: symbol(),
            })
            .unwrap();
        for option in OPTIONS {
            engine.add_option(&publisher, &name(ballot), &name(option), "").unwrap();
        }
        let end = Timestamp::new(NOW + (2 + i as u64) * DAY);
        engine.ready(&publisher, &name(ballot), end).unwrap();
    }
    (engine, clock)
}

/// Apply one operation; rejections are expected and ignored.
fn apply(engine: &Engine, clock: &NullClock, op: &Op) {
    let publisher = name("pub");
    let _ = match op {
        Op::Mint(v, a) => engine.mint(&publisher, &name(VOTERS[*v]), &amount(*a)),
        Op::Burn(a) => {
            let _ = engine.mint(&publisher, &publisher, &amount(*a));
            engine.burn(&publisher, &amount(*a / 2))
        }
        Op::Cast(v, b, o) => engine.cast(&name(VOTERS[*v]), &name(BALLOTS[*b]), &name(OPTIONS[*o])),
        Op::Retract(v, b, o) => {
            engine.retract(&name(VOTERS[*v]), &name(BALLOTS[*b]), &name(OPTIONS[*o]))
        }
        Op::Reweight(v, a) => engine
            .reweight(&name(VOTERS[*v]), &symbol(), &amount(*a))
            .map(|_| ()),
        Op::Advance(secs) => {
            clock.advance(*secs);
            Ok(())
        }
        Op::Close(b) => engine.close_ballot(&publisher, &name(BALLOTS[*b]), BallotStatus::Closed),
        Op::Sweep(v, n) => engine.sweep(&name(VOTERS[*v]), *n, &symbol()).map(|_| ()),
    };
}

fn status_rank(status: BallotStatus) -> u8 {
    match status {
        BallotStatus::Setup => 0,
        BallotStatus::Open => 1,
        BallotStatus::Closed => 2,
    }
}

/// Every option's tally equals the locked weight of the receipts selecting it.
fn assert_tallies_match_receipts(engine: &Engine) -> Result<(), TestCaseError> {
    for ballot_name in BALLOTS {
        let ballot = engine.ballot(&name(ballot_name)).unwrap().unwrap();
        for option in &ballot.options {
            let mut expected = 0i64;
            let mut voters = 0u32;
            for voter in VOTERS {
                if let Some(receipt) = engine.receipt(&name(voter), &ballot.name).unwrap() {
                    if receipt.has_selected(&option.name) {
                        expected += receipt.locked_weight.amount;
                    }
                    if option.name == ballot.options[0].name {
                        voters += 1;
                    }
                }
            }
            prop_assert_eq!(option.weight.amount, expected, "ballot {} option {}", ballot.name, option.name);
            if option.name == ballot.options[0].name {
                prop_assert_eq!(ballot.unique_voters, voters);
            }
        }
    }
    Ok(())
}

/// Supply stays within bounds and equals the sum of balances.
fn assert_ledger_consistent(engine: &Engine) -> Result<(), TestCaseError> {
    let registry = engine.registry(&code()).unwrap().unwrap();
    prop_assert!(registry.supply.amount >= 0);
    prop_assert!(registry.supply.amount <= registry.max_supply.amount);
    let mut total = 0i64;
    for owner in VOTERS.iter().chain(["pub"].iter()) {
        let account = engine.account(&name(owner), &code()).unwrap().unwrap();
        prop_assert!(account.balance.amount >= 0);
        total += account.balance.amount;
    }
    prop_assert_eq!(total, registry.supply.amount);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Without sweeping, tallies always mirror the receipt set.
    #[test]
    fn tallies_mirror_receipts(ops in prop::collection::vec(arb_op(false), 1..60)) {
        let (engine, clock) = world(51);
        for op in &ops {
            apply(&engine, &clock, op);
            assert_tallies_match_receipts(&engine)?;
        }
    }

    /// Supply bounds and non-negative balances survive any operation sequence.
    #[test]
    fn ledger_stays_consistent(ops in prop::collection::vec(arb_op(true), 1..60)) {
        let (engine, clock) = world(51);
        for op in &ops {
            apply(&engine, &clock, op);
            assert_ledger_consistent(&engine)?;
        }
    }

    /// No account ever exceeds the open receipt ceiling, and ballot status
    /// never moves backwards.
    #[test]
    fn receipt_ceiling_and_forward_status(ops in prop::collection::vec(arb_op(true), 1..60)) {
        let (engine, clock) = world(MAX_RECEIPTS);
        let mut ranks = [1u8; BALLOTS.len()];
        for op in &ops {
            apply(&engine, &clock, op);
            for voter in VOTERS {
                let account = engine.account(&name(voter), &code()).unwrap().unwrap();
                prop_assert!(account.open_receipts <= MAX_RECEIPTS);
            }
            for (i, ballot) in BALLOTS.iter().enumerate() {
                let status = engine.ballot(&name(ballot)).unwrap().unwrap().status;
                prop_assert!(status_rank(status) >= ranks[i]);
                ranks[i] = status_rank(status);
            }
        }
    }
}
