//! play - plan and simulate Rarity bulk actions
//!
//! Reads a roster snapshot (JSON array of summoners) and either prints the
//! chunk plan for every activity or runs one action against the in-memory
//! chain.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rarity_play::core::batch::chunk_count;
use rarity_play::core::chain::{ChainClients, MemoryChain};
use rarity_play::core::notify::TracingSink;
use rarity_play::utils::init_logging;
use rarity_play::{Activity, Address, BatchReport, BulkAction, Config, PlayService, Summoner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "play",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about = "Plan and simulate Rarity bulk actions"
)]
struct Cli {
    /// YAML configuration file; PLAY_* environment variables are used when omitted
    #[arg(short, long, global = true, env = "PLAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print candidate counts and the chunk plan for every activity
    Plan {
        /// Roster snapshot file
        #[arg(long)]
        snapshot: PathBuf,
        /// Unix time to evaluate cooldowns at; defaults to now
        #[arg(long)]
        now: Option<u64>,
    },
    /// Run one action against an in-memory chain seeded from the snapshot
    Simulate {
        action: ActionArg,
        /// Roster snapshot file
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        now: Option<u64>,
        /// Days to register for the daycare action
        #[arg(long, default_value_t = 1)]
        days: u32,
        /// Account that owns the snapshot's summoners
        #[arg(long, default_value = "0x00000000000000000000000000000000000000a1")]
        account: Address,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Adventure,
    LevelUp,
    ClaimGold,
    Cellar,
    Daycare,
}

impl ActionArg {
    fn activity(self) -> Option<Activity> {
        match self {
            ActionArg::Adventure => Some(Activity::Adventure),
            ActionArg::LevelUp => Some(Activity::LevelUp),
            ActionArg::ClaimGold => Some(Activity::ClaimGold),
            ActionArg::Cellar => Some(Activity::Cellar),
            ActionArg::Daycare => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    init_logging(config.logging())?;

    let build = rarity_play::build_info();
    debug!(
        version = build.version,
        git_hash = build.git_hash,
        build_time = build.build_time,
        "Starting play"
    );

    match cli.command {
        Command::Plan { snapshot, now } => {
            let summoners = read_snapshot(&snapshot).await?;
            plan(&config, summoners, now.unwrap_or_else(unix_now))
        }
        Command::Simulate {
            action,
            snapshot,
            now,
            days,
            account,
        } => {
            let summoners = read_snapshot(&snapshot).await?;
            let report = simulate(
                &config,
                summoners,
                action,
                now.unwrap_or_else(unix_now),
                days,
                account,
            )
            .await?;
            print_report(&report)
        }
    }
}

async fn read_snapshot(path: &Path) -> anyhow::Result<Vec<Summoner>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

fn plan(config: &Config, summoners: Vec<Summoner>, now: u64) -> anyhow::Result<()> {
    let roster = rarity_play::Roster::new(summoners)?;
    println!("{} summoners, evaluated at {}", roster.len(), now);

    for activity in Activity::ALL {
        let action = BulkAction::from(activity);
        let candidates = roster.candidates(activity, now);
        let limit = action.per_call_limit(config.batch().chunk_size);
        println!(
            "{:<12} {:>5} candidates {:>4} chunks of up to {}",
            action.label(),
            candidates.len(),
            chunk_count(candidates.len(), limit),
            limit
        );
    }
    Ok(())
}

async fn simulate(
    config: &Config,
    summoners: Vec<Summoner>,
    action: ActionArg,
    now: u64,
    days: u32,
    account: Address,
) -> anyhow::Result<BatchReport> {
    let helper = config.contracts().helper;
    if account == helper {
        bail!("Simulated account must differ from the helper address");
    }

    let chain = Arc::new(MemoryChain::new(account, helper));
    chain.set_now(now);
    chain.mint(account, summoners);

    let service = PlayService::new(
        config.play.clone(),
        chain.clone(),
        chain.clone(),
        ChainClients::from_single(chain.clone()),
        Arc::new(TracingSink),
    )
    .with_clock(move || now);
    service.refresh().await?;

    let report = match action.activity() {
        Some(activity) => {
            if BulkAction::from(activity).requires_operator_approval() {
                service.approve_helper().await?;
            }
            match activity {
                Activity::Adventure => service.send_adventure().await?,
                Activity::LevelUp => service.send_level_up().await?,
                Activity::ClaimGold => service.send_claim_gold().await?,
                Activity::Cellar => service.send_cellar().await?,
            }
        }
        None => service.register_daycare_all(days).await?,
    };
    Ok(report)
}

fn print_report(report: &BatchReport) -> anyhow::Result<()> {
    let summary = serde_json::json!({
        "run_id": report.run_id,
        "action": report.action,
        "state": report.state,
        "summary": report.summary(),
        "confirmed": report.confirmed_ids(),
        "blocks": report.receipts.iter().map(|r| r.receipt.block_number).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
