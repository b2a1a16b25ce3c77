// Read-only inspector for a persisted equity ledger

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use equity_ledger::access::StatusRegistry;
use equity_ledger::account::Address;
use equity_ledger::ledger::SnapshotId;
use equity_ledger::storage::{StoreError, TokenStore};
use equity_ledger::token::{EquityToken, TokenError};
use equity_ledger::Timestamp;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "equity")]
#[command(about = "Inspect balances, offers and snapshots of an equity ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ledger database directory
    #[arg(short, long, global = true, default_value = ".equity")]
    db: PathBuf,

    /// Evaluate locks and expiries at this Unix time instead of the current time
    #[arg(long, global = true)]
    now: Option<Timestamp>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show token metadata, supply and snapshot counter
    Summary,

    /// Show every balance figure of an account
    Account {
        /// Account address (0x-prefixed hex)
        address: Address,
    },

    /// List the stored offers of an account
    Offers {
        /// Account address (0x-prefixed hex)
        address: Address,
    },

    /// Show an account balance and the total supply at a snapshot
    History {
        /// Account address (0x-prefixed hex)
        address: Address,

        /// Snapshot id
        #[arg(long)]
        at: SnapshotId,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("No ledger found in {0}")]
    NoLedger(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let store = TokenStore::open(&cli.db)?;
    let token = store
        .load_token()?
        .ok_or_else(|| CliError::NoLedger(cli.db.display().to_string()))?;
    let now = cli.now.unwrap_or_else(current_time);
    debug!(db = %cli.db.display(), now, "ledger loaded");

    match cli.command {
        Commands::Summary => summary(&token),
        Commands::Account { address } => account(&token, &address, now),
        Commands::Offers { address } => offers(&token, &address, now),
        Commands::History { address, at } => history(&token, &address, at)?,
    }
    Ok(())
}

fn summary(token: &EquityToken<StatusRegistry>) {
    let state = token.state();
    println!("{} ({})", token.name(), token.symbol());
    println!("  total supply:      {}", token.total_supply());
    println!("  holders:           {}", state.balances().holder_count());
    println!("  registered:        {}", token.oracle().len());
    println!("  snapshot:          {}", token.current_snapshot_id());
    println!("  offer window:      {}s", state.config().offer_expiry_secs);
}

fn account(token: &EquityToken<StatusRegistry>, address: &Address, now: Timestamp) {
    let status = token
        .oracle()
        .status_of(address)
        .map(|status| status.to_string())
        .unwrap_or_else(|| "none".to_string());

    println!("{}", address);
    println!("  status:            {}", status);
    println!("  balance:           {}", token.balance_of(address));
    println!("  vesting:           {}", token.vesting_balance_of(address));
    println!("  offered:           {}", token.offered_balance_of(address, now));
    println!("  unlocked:          {}", token.unlocked_balance_of(address, now));
    println!("  locked:            {}", token.locked_balance_of(address, now));
}

fn offers(token: &EquityToken<StatusRegistry>, address: &Address, now: Timestamp) {
    let offers = token.offers_of(address);
    if offers.is_empty() {
        println!("{} has no offers", address);
        return;
    }

    for offer in offers {
        let state = if offer.is_active(now) { "active" } else { "expired" };
        println!(
            "  {:<10} {:>20}  expires {}  [{}]",
            offer.id().to_string(),
            offer.amount(),
            format_time(offer.expires_at()),
            state
        );
    }
}

fn history(token: &EquityToken<StatusRegistry>, address: &Address, at: SnapshotId) -> Result<(), CliError> {
    println!("snapshot {} of {}", at, token.current_snapshot_id());
    println!("  balance:           {}", token.balance_of_at(address, at)?);
    println!("  total supply:      {}", token.total_supply_at(at)?);
    Ok(())
}

fn current_time() -> Timestamp {
    Utc::now().timestamp().max(0) as Timestamp
}

fn format_time(secs: Timestamp) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
