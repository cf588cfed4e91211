//! One subcommand per engine operation.

use anyhow::Context;
use serde_json::{json, Value};
use trail_engine::{NewBallot, TrailEngine};
use trail_store::{BallotStatus, TokenSettings, TrailStore};
use trail_types::{Asset, Clock, Name, Symbol, SymbolCode, Timestamp};

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Register a new token symbol.
    NewToken {
        #[arg(long)]
        publisher: Name,
        /// Maximum supply, e.g. "1000.0000 VOTE". Fixes code and precision.
        #[arg(long)]
        max_supply: Asset,
        #[arg(long, default_value = "")]
        info_url: String,
        /// Token settings as JSON; omitted fields take their defaults.
        #[arg(long)]
        settings: Option<String>,
    },
    /// Issue tokens to an open account.
    Mint {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        recipient: Name,
        #[arg(long)]
        amount: Asset,
    },
    /// Destroy tokens from the publisher's own account.
    Burn {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        amount: Asset,
    },
    /// Validate a transfer (balance movement is not supported).
    Send {
        #[arg(long)]
        sender: Name,
        #[arg(long)]
        recipient: Name,
        #[arg(long)]
        amount: Asset,
        #[arg(long, default_value = "")]
        memo: String,
    },
    /// Validate a seizure (balance movement is not supported).
    Seize {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        owner: Name,
        #[arg(long)]
        amount: Asset,
    },
    /// Open a zero balance, e.g. `--symbol 4,VOTE`.
    Open {
        #[arg(long)]
        owner: Name,
        #[arg(long)]
        symbol: Symbol,
    },
    /// Close an empty balance.
    Close {
        #[arg(long)]
        owner: Name,
        #[arg(long)]
        symbol: Symbol,
    },
    /// Create a ballot in setup.
    NewBallot {
        #[arg(long)]
        name: Name,
        #[arg(long)]
        category: Name,
        #[arg(long)]
        publisher: Name,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        info_url: String,
        #[arg(long, default_value_t = 1)]
        max_votable_options: u8,
        #[arg(long)]
        voting_symbol: Symbol,
    },
    /// Replace a ballot's title, description and info URL.
    SetInfo {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        info_url: String,
    },
    /// Add an option to a ballot in setup.
    AddOption {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long)]
        option: Name,
        #[arg(long, default_value = "")]
        info: String,
    },
    /// Open a ballot for voting until `--end-time` (Unix seconds).
    Ready {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long)]
        end_time: u64,
    },
    /// Close a ballot whose end time has passed.
    CloseBallot {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long, default_value = "closed")]
        status: BallotStatus,
    },
    /// Delete a ballot that is not open.
    DeleteBallot {
        #[arg(long)]
        publisher: Name,
        #[arg(long)]
        ballot: Name,
    },
    /// Vote for an option.
    Vote {
        #[arg(long)]
        voter: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long)]
        option: Name,
    },
    /// Withdraw a vote for an option.
    Unvote {
        #[arg(long)]
        voter: Name,
        #[arg(long)]
        ballot: Name,
        #[arg(long)]
        option: Name,
    },
    /// Remove a voter's expired receipts.
    Sweep {
        #[arg(long)]
        voter: Name,
        #[arg(long, default_value_t = 10)]
        max_count: usize,
        #[arg(long)]
        symbol: Symbol,
    },
    /// Re-apply a voter's balance to their receipts on open ballots.
    Reweight {
        #[arg(long)]
        voter: Name,
        #[arg(long)]
        symbol: Symbol,
        #[arg(long)]
        balance: Asset,
    },
    /// Print a token registry.
    ShowToken {
        #[arg(long)]
        symbol: SymbolCode,
    },
    /// Print an owner's balances.
    ShowAccount {
        #[arg(long)]
        owner: Name,
    },
    /// Print a ballot with its tallies.
    ShowBallot {
        #[arg(long)]
        ballot: Name,
    },
    /// Print a voter's receipts.
    ShowReceipts {
        #[arg(long)]
        voter: Name,
    },
}

/// Execute `command` and describe the result as JSON.
pub fn run<S: TrailStore, C: Clock>(
    engine: &TrailEngine<S, C>,
    command: Command,
) -> anyhow::Result<Value> {
    let output = match command {
        Command::NewToken {
            publisher,
            max_supply,
            info_url,
            settings,
        } => {
            let settings = match settings {
                Some(raw) => serde_json::from_str(&raw).context("invalid --settings JSON")?,
                None => TokenSettings::default(),
            };
            let registry = engine.create_registry(&publisher, max_supply, settings, info_url)?;
            serde_json::to_value(registry)?
        }
        Command::Mint {
            publisher,
            recipient,
            amount,
        } => {
            engine.mint(&publisher, &recipient, &amount)?;
            account_json(engine, &recipient, amount.symbol.code())?
        }
        Command::Burn { publisher, amount } => {
            engine.burn(&publisher, &amount)?;
            account_json(engine, &publisher, amount.symbol.code())?
        }
        Command::Send {
            sender,
            recipient,
            amount,
            memo,
        } => {
            engine.send(&sender, &recipient, &amount, &memo)?;
            json!({ "sent": amount.to_string() })
        }
        Command::Seize {
            publisher,
            owner,
            amount,
        } => {
            engine.seize(&publisher, &owner, &amount)?;
            json!({ "seized": amount.to_string() })
        }
        Command::Open { owner, symbol } => {
            engine.open(&owner, &symbol)?;
            account_json(engine, &owner, symbol.code())?
        }
        Command::Close { owner, symbol } => {
            engine.close(&owner, &symbol)?;
            json!({ "closed": format!("{owner} {}", symbol.code()) })
        }
        Command::NewBallot {
            name,
            category,
            publisher,
            title,
            description,
            info_url,
            max_votable_options,
            voting_symbol,
        } => {
            let ballot = engine.create_ballot(NewBallot {
                name,
                category,
                publisher,
                title,
                description,
                info_url,
                max_votable_options,
                voting_symbol,
            })?;
            serde_json::to_value(ballot)?
        }
        Command::SetInfo {
            publisher,
            ballot,
            title,
            description,
            info_url,
        } => {
            engine.set_info(&publisher, &ballot, title, description, info_url)?;
            ballot_json(engine, &ballot)?
        }
        Command::AddOption {
            publisher,
            ballot,
            option,
            info,
        } => {
            engine.add_option(&publisher, &ballot, &option, info)?;
            ballot_json(engine, &ballot)?
        }
        Command::Ready {
            publisher,
            ballot,
            end_time,
        } => {
            engine.ready(&publisher, &ballot, Timestamp::new(end_time))?;
            ballot_json(engine, &ballot)?
        }
        Command::CloseBallot {
            publisher,
            ballot,
            status,
        } => {
            engine.close_ballot(&publisher, &ballot, status)?;
            ballot_json(engine, &ballot)?
        }
        Command::DeleteBallot { publisher, ballot } => {
            engine.delete_ballot(&publisher, &ballot)?;
            json!({ "deleted": ballot })
        }
        Command::Vote {
            voter,
            ballot,
            option,
        } => {
            engine.cast(&voter, &ballot, &option)?;
            serde_json::to_value(engine.receipt(&voter, &ballot)?)?
        }
        Command::Unvote {
            voter,
            ballot,
            option,
        } => {
            engine.retract(&voter, &ballot, &option)?;
            serde_json::to_value(engine.receipt(&voter, &ballot)?)?
        }
        Command::Sweep {
            voter,
            max_count,
            symbol,
        } => {
            let removed = engine.sweep(&voter, max_count, &symbol)?;
            json!({ "removed": removed })
        }
        Command::Reweight {
            voter,
            symbol,
            balance,
        } => {
            let reweighted = engine.reweight(&voter, &symbol, &balance)?;
            json!({ "reweighted": reweighted })
        }
        Command::ShowToken { symbol } => {
            let registry = engine
                .registry(&symbol)?
                .with_context(|| format!("no registry for {symbol}"))?;
            serde_json::to_value(registry)?
        }
        Command::ShowAccount { owner } => serde_json::to_value(engine.accounts(&owner)?)?,
        Command::ShowBallot { ballot } => ballot_json(engine, &ballot)?,
        Command::ShowReceipts { voter } => serde_json::to_value(engine.receipts(&voter)?)?,
    };
    Ok(output)
}

fn account_json<S: TrailStore, C: Clock>(
    engine: &TrailEngine<S, C>,
    owner: &Name,
    code: &SymbolCode,
) -> anyhow::Result<Value> {
    let account = engine
        .account(owner, code)?
        .with_context(|| format!("no {code} balance for {owner}"))?;
    Ok(serde_json::to_value(account)?)
}

fn ballot_json<S: TrailStore, C: Clock>(
    engine: &TrailEngine<S, C>,
    ballot: &Name,
) -> anyhow::Result<Value> {
    let ballot = engine
        .ballot(ballot)?
        .with_context(|| format!("no ballot {ballot}"))?;
    Ok(serde_json::to_value(ballot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use trail_engine::{EngineConfig, ErrorKind, TrailError};
    use trail_nullables::{NullClock, NullStore};

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn exec(engine: &TrailEngine<NullStore, NullClock>, args: &[&str]) -> anyhow::Result<Value> {
        let cli = TestCli::try_parse_from(std::iter::once("trail").chain(args.iter().copied()))?;
        run(engine, cli.command)
    }

    fn engine() -> (TrailEngine<NullStore, NullClock>, NullClock) {
        let clock = NullClock::new(1_000);
        let engine = TrailEngine::new(NullStore::new(), clock.clone(), EngineConfig::default());
        (engine, clock)
    }

    #[test]
    fn malformed_arguments_are_rejected_by_the_parser() {
        let (engine, _) = engine();
        assert!(exec(&engine, &["open", "--owner", "Alice", "--symbol", "4,VOTE"]).is_err());
        assert!(exec(&engine, &["mint", "--publisher", "pub", "--recipient", "a", "--amount", "10"]).is_err());
    }

    #[test]
    fn token_and_voting_round_trip_through_commands() {
        let (engine, clock) = engine();
        let registry = exec(
            &engine,
            &["new-token", "--publisher", "pub", "--max-supply", "1000.0000 VOTE"],
        )
        .unwrap();
        assert_eq!(registry["publisher"], "pub");

        exec(&engine, &["open", "--owner", "alice", "--symbol", "4,VOTE"]).unwrap();
        let account = exec(
            &engine,
            &["mint", "--publisher", "pub", "--recipient", "alice", "--amount", "5.0000 VOTE"],
        )
        .unwrap();
        assert_eq!(account["open_receipts"], 0);

        exec(
            &engine,
            &[
                "new-ballot", "--name", "b1", "--category", "poll", "--publisher", "pub",
                "--max-votable-options", "2", "--voting-symbol", "4,VOTE",
            ],
        )
        .unwrap();
        for option in ["yes", "no"] {
            exec(
                &engine,
                &["add-option", "--publisher", "pub", "--ballot", "b1", "--option", option],
            )
            .unwrap();
        }
        let end = (1_000 + 2 * 86_400).to_string();
        let ballot = exec(
            &engine,
            &["ready", "--publisher", "pub", "--ballot", "b1", "--end-time", &end],
        )
        .unwrap();
        assert_eq!(ballot["status"], "Open");

        let receipt = exec(
            &engine,
            &["vote", "--voter", "alice", "--ballot", "b1", "--option", "yes"],
        )
        .unwrap();
        assert_eq!(receipt["selections"][0], "yes");

        clock.set(1_000 + 2 * 86_400 + 1);
        exec(&engine, &["close-ballot", "--publisher", "pub", "--ballot", "b1"]).unwrap();
        let swept = exec(
            &engine,
            &["sweep", "--voter", "alice", "--symbol", "4,VOTE"],
        )
        .unwrap();
        assert_eq!(swept["removed"], 1);
    }

    #[test]
    fn engine_rejections_surface_as_trail_errors() {
        let (engine, _) = engine();
        let err = exec(&engine, &["show-ballot", "--ballot", "nope"]).unwrap_err();
        assert!(err.to_string().contains("no ballot"));

        let err = exec(
            &engine,
            &["mint", "--publisher", "pub", "--recipient", "alice", "--amount", "1.0000 VOTE"],
        )
        .unwrap_err();
        let trail = err.downcast_ref::<TrailError>().unwrap();
        assert_eq!(trail.kind(), ErrorKind::NotFound);
    }
}
