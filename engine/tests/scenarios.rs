//! End-to-end ballot scenarios: registry → balances → ballot lifecycle →
//! voting → closing, run against the in-memory store and a pinned clock.

use trail_engine::{EngineConfig, ErrorKind, NewBallot, TrailEngine};
use trail_nullables::{NullClock, NullStore};
use trail_store::{BallotStatus, TokenSettings};
use trail_types::{Asset, Name, Symbol, SymbolCode, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NOW: u64 = 1_700_000_000;
const DAY: u64 = 86_400;

type Engine = TrailEngine<NullStore, NullClock>;

fn name(s: &str) -> Name {
    Name::new(s).expect("valid name")
}

fn vote(s: &str) -> Asset {
    s.parse().expect("valid asset")
}

fn symbol() -> Symbol {
    "4,VOTE".parse().expect("valid symbol")
}

fn code() -> SymbolCode {
    SymbolCode::new("VOTE").expect("valid code")
}

fn engine() -> (Engine, NullClock) {
    let clock = NullClock::new(NOW);
    let engine = TrailEngine::new(NullStore::new(), clock.clone(), EngineConfig::default());
    (engine, clock)
}

fn weight(engine: &Engine, ballot: &str, option: &str) -> Asset {
    engine
        .ballot(&name(ballot))
        .unwrap()
        .expect("ballot exists")
        .option(&name(option))
        .expect("option exists")
        .weight
        .clone()
}

/// Scenario 1: registry with 1000 VOTE max supply, alice holds 100.
fn funded(engine: &Engine) {
    let publisher = name("pub");
    engine
        .create_registry(&publisher, vote("1000.0000 VOTE"), TokenSettings::default(), "https://vote.example")
        .unwrap();
    engine.open(&name("alice"), &symbol()).unwrap();
    engine.mint(&publisher, &name("alice"), &vote("100.0000 VOTE")).unwrap();
}

/// Scenario 2: ballot b1 with two options, open for two days.
fn ready_ballot(engine: &Engine) {
    let publisher = name("pub");
    engine
        .create_ballot(NewBallot {
            name: name("b1"),
            category: name("poll"),
            publisher: publisher.clone(),
            title: "Pick one or both".into(),
            description: String::new(),
            info_url: String::new(),
            max_votable_options: 2,
            voting_symbol: symbol(),
        })
        .unwrap();
    engine.add_option(&publisher, &name("b1"), &name("opt1"), "").unwrap();
    engine.add_option(&publisher, &name("b1"), &name("opt2"), "").unwrap();
    engine
        .ready(&publisher, &name("b1"), Timestamp::new(NOW + 2 * DAY))
        .unwrap();
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn mint_credits_recipient_and_supply() {
    let (engine, _) = engine();
    funded(&engine);
    let registry = engine.registry(&code()).unwrap().unwrap();
    assert_eq!(registry.supply, vote("100.0000 VOTE"));
    let alice = engine.account(&name("alice"), &code()).unwrap().unwrap();
    assert_eq!(alice.balance, vote("100.0000 VOTE"));
}

#[test]
fn ready_opens_ballot_now() {
    let (engine, _) = engine();
    funded(&engine);
    ready_ballot(&engine);
    let ballot = engine.ballot(&name("b1")).unwrap().unwrap();
    assert_eq!(ballot.status, BallotStatus::Open);
    assert_eq!(ballot.begin_time, Timestamp::new(NOW));
}

#[test]
fn full_voting_walkthrough() {
    let (engine, clock) = engine();
    funded(&engine);
    ready_ballot(&engine);
    let alice = name("alice");
    let b1 = name("b1");

    // Scenario 3
    engine.cast(&alice, &b1, &name("opt1")).unwrap();
    assert_eq!(weight(&engine, "b1", "opt1"), vote("100.0000 VOTE"));
    let receipt = engine.receipt(&alice, &b1).unwrap().unwrap();
    assert_eq!(receipt.selections, vec![name("opt1")]);
    assert_eq!(engine.ballot(&b1).unwrap().unwrap().unique_voters, 1);

    // Scenario 4
    clock.advance(3_600);
    engine.cast(&alice, &b1, &name("opt2")).unwrap();
    assert_eq!(weight(&engine, "b1", "opt2"), vote("100.0000 VOTE"));
    let receipt = engine.receipt(&alice, &b1).unwrap().unwrap();
    assert_eq!(receipt.selections, vec![name("opt1"), name("opt2")]);

    // Scenario 5
    engine.retract(&alice, &b1, &name("opt1")).unwrap();
    assert_eq!(weight(&engine, "b1", "opt1"), vote("0.0000 VOTE"));
    let receipt = engine.receipt(&alice, &b1).unwrap().unwrap();
    assert_eq!(receipt.selections, vec![name("opt2")]);
    assert_eq!(engine.ballot(&b1).unwrap().unwrap().unique_voters, 1);

    // Scenario 6
    engine.retract(&alice, &b1, &name("opt2")).unwrap();
    assert!(engine.receipt(&alice, &b1).unwrap().is_none());
    assert_eq!(engine.ballot(&b1).unwrap().unwrap().unique_voters, 0);
    assert_eq!(weight(&engine, "b1", "opt2"), vote("0.0000 VOTE"));
}

#[test]
fn close_before_end_time_is_rejected() {
    let (engine, clock) = engine();
    funded(&engine);
    ready_ballot(&engine);

    // Scenario 7
    clock.advance(DAY);
    let err = engine
        .close_ballot(&name("pub"), &name("b1"), BallotStatus::Closed)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidState | ErrorKind::OutOfWindow));
    assert_eq!(
        engine.ballot(&name("b1")).unwrap().unwrap().status,
        BallotStatus::Open
    );
}

#[test]
fn closed_ballot_keeps_final_tally_and_refuses_votes() {
    let (engine, clock) = engine();
    funded(&engine);
    ready_ballot(&engine);
    engine.cast(&name("alice"), &name("b1"), &name("opt1")).unwrap();

    clock.set(NOW + 2 * DAY + 1);
    engine
        .close_ballot(&name("pub"), &name("b1"), BallotStatus::Closed)
        .unwrap();

    let err = engine
        .retract(&name("alice"), &name("b1"), &name("opt1"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(weight(&engine, "b1", "opt1"), vote("100.0000 VOTE"));

    // The expired receipt can now be reclaimed by anyone.
    assert_eq!(engine.sweep(&name("alice"), 5, &symbol()).unwrap(), 1);
    assert!(engine.receipts(&name("alice")).unwrap().is_empty());
    assert_eq!(weight(&engine, "b1", "opt1"), vote("100.0000 VOTE"));
}

#[test]
fn rejected_operation_persists_nothing() {
    let (engine, _) = engine();
    funded(&engine);
    ready_ballot(&engine);
    let before = engine.ballot(&name("b1")).unwrap().unwrap();

    let err = engine
        .cast(&name("alice"), &name("b1"), &name("opt3"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(engine.ballot(&name("b1")).unwrap().unwrap(), before);
    assert!(engine.receipt(&name("alice"), &name("b1")).unwrap().is_none());
    let alice = engine.account(&name("alice"), &code()).unwrap().unwrap();
    assert_eq!(alice.open_receipts, 0);
}

#[test]
fn reweight_follows_a_balance_change() {
    let (engine, _) = engine();
    funded(&engine);
    ready_ballot(&engine);
    let alice = name("alice");
    engine.cast(&alice, &name("b1"), &name("opt1")).unwrap();
    engine.cast(&alice, &name("b1"), &name("opt2")).unwrap();

    engine.mint(&name("pub"), &alice, &vote("25.0000 VOTE")).unwrap();
    let balance = engine.account(&alice, &code()).unwrap().unwrap().balance;
    assert_eq!(engine.reweight(&alice, &symbol(), &balance).unwrap(), 1);

    assert_eq!(weight(&engine, "b1", "opt1"), vote("125.0000 VOTE"));
    assert_eq!(weight(&engine, "b1", "opt2"), vote("125.0000 VOTE"));
}
