//! Command-line front end over the file-backed ledger.
//!
//! The binary delegates to [`run`] so every command can be exercised in tests
//! against an in-memory ledger via [`execute`].

mod error;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mockable::DefaultClock;

pub use self::error::CliError;
use crate::account::{Account, UserId};
use crate::config::LedgerSettings;
use crate::ledger::CoinLedger;
use crate::notice::{Notice, NoticeSeverity};
use crate::outbound::FileKeyValueStore;
use crate::ports::KeyValueStore;
use crate::rewards::award_post;
use crate::shop::{ShopCatalog, purchase_item};

/// `coin-ledger` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "coin-ledger",
    about = "Inspect and update Traveller Connect coin balances",
    version
)]
pub struct Cli {
    /// Account to operate on.
    #[arg(long = "user", value_name = "id", global = true)]
    pub user: Option<String>,
    /// Store directory. Overrides `COIN_LEDGER_STORE_DIR`.
    #[arg(long = "store-dir", value_name = "path", global = true)]
    pub store_dir: Option<PathBuf>,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Ledger operations exposed on the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the current balance.
    Balance,
    /// Print the transaction history, newest first.
    History,
    /// Grant the reward for publishing a post.
    AwardPost {
        /// Post that earned the reward.
        #[arg(long = "post-id", value_name = "id")]
        post_id: String,
    },
    /// Credit coins.
    Credit {
        /// Coins to credit.
        amount: u32,
        /// Reason recorded on the transaction.
        #[arg(long, value_name = "text")]
        reason: String,
        /// Post that triggered the credit.
        #[arg(long = "post-id", value_name = "id")]
        post_id: Option<String>,
    },
    /// Debit coins.
    Debit {
        /// Coins to debit.
        amount: u32,
        /// Reason recorded on the transaction.
        #[arg(long, value_name = "text")]
        reason: String,
    },
    /// Buy a shop item by catalogue id.
    Purchase {
        /// Catalogue id, for example `premium-1`.
        item_id: String,
    },
    /// List the shop catalogue and what the user can afford.
    Shop,
}

/// Open the configured store and run `cli`, writing results to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the user is missing or invalid, the store cannot
/// be opened, or the ledger rejects the operation.
pub fn run(cli: Cli, settings: &LedgerSettings, out: &mut impl Write) -> Result<(), CliError> {
    let raw_user = cli.user.ok_or(CliError::MissingUser)?;
    let user_id = UserId::new(raw_user)?;
    let store_dir = cli.store_dir.unwrap_or_else(|| settings.store_dir());
    let store = FileKeyValueStore::open(&store_dir)?;
    let ledger = CoinLedger::new(Arc::new(store), Arc::new(DefaultClock))
        .with_storage_key(settings.storage_key())
        .with_max_balance(settings.max_balance());
    execute(&ledger, &user_id, cli.command, out)
}

/// Run one command against `ledger` for `user_id`.
///
/// # Errors
///
/// Returns [`CliError`] when the ledger rejects the operation or output
/// cannot be written.
pub fn execute<S: KeyValueStore>(
    ledger: &CoinLedger<S>,
    user_id: &UserId,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Balance => write_balance(out, &ledger.get_account(user_id)),
        Command::History => write_history(out, &ledger.get_account(user_id)),
        Command::AwardPost { post_id } => {
            let receipt = award_post(ledger, user_id, post_id)?;
            write_notices(out, &receipt.notices())?;
            write_balance(out, &receipt.account)
        }
        Command::Credit {
            amount,
            reason,
            post_id,
        } => {
            let receipt = ledger.credit(user_id, amount, &reason, post_id)?;
            write_notices(out, &receipt.notices())?;
            write_balance(out, &receipt.account)
        }
        Command::Debit { amount, reason } => {
            let account = ledger.debit(user_id, amount, &reason)?;
            write_balance(out, &account)
        }
        Command::Purchase { item_id } => {
            let item = ShopCatalog.find(&item_id)?;
            let notice = purchase_item(ledger, user_id, item)?;
            write_notices(out, &[notice])?;
            write_balance(out, &ledger.get_account(user_id))
        }
        Command::Shop => {
            let balance = ledger.get_account(user_id).balance;
            for item in ShopCatalog.items() {
                let status = if item.can_afford(balance) {
                    "available"
                } else {
                    "locked"
                };
                let badges = match (item.is_new, item.is_best_seller) {
                    (true, true) => " [new, best seller]",
                    (true, false) => " [new]",
                    (false, true) => " [best seller]",
                    (false, false) => "",
                };
                write_line(
                    out,
                    &format!(
                        "{}\t{}\t{}\t{status}{badges}",
                        item.id, item.title, item.price
                    ),
                )?;
            }
            write_balance(out, &ledger.get_account(user_id))
        }
    }
}

fn write_balance(out: &mut impl Write, account: &Account) -> Result<(), CliError> {
    write_line(out, &format!("balance={}", account.balance))
}

fn write_history(out: &mut impl Write, account: &Account) -> Result<(), CliError> {
    if account.transactions.is_empty() {
        return write_line(out, "No transactions yet");
    }
    for transaction in &account.transactions {
        let sign = if transaction.is_credit() { "+" } else { "" };
        write_line(
            out,
            &format!(
                "{}\t{sign}{}\t{}",
                transaction.timestamp.to_rfc3339(),
                transaction.amount,
                transaction.description
            ),
        )?;
    }
    Ok(())
}

fn write_notices(out: &mut impl Write, notices: &[Notice]) -> Result<(), CliError> {
    for notice in notices {
        let label = match notice.severity() {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Success => "success",
            NoticeSeverity::Error => "error",
        };
        write_line(out, &format!("[{label}] {notice}"))?;
    }
    Ok(())
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), CliError> {
    writeln!(out, "{line}").map_err(|err| CliError::Output {
        message: err.to_string(),
    })
}
