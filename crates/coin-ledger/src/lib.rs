//! Virtual coin balances for Traveller Connect.
//!
//! The crate owns every user's coin balance together with the immutable
//! history of changes to it. Coins are earned by posting travel updates and
//! spent in the coin shop.
//!
//! # Overview
//!
//! - [`CoinLedger`] is the single source of truth. It validates input, keeps
//!   balances within `0..=MAX_BALANCE`, persists through a
//!   [`KeyValueStore`](ports::KeyValueStore), and notifies subscribers after
//!   every successful mutation.
//! - [`rewards`] and [`shop`] are the collaborator flows that call into the
//!   ledger.
//! - [`outbound`] holds the in-memory and file-backed store adapters.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use coin_ledger::outbound::InMemoryKeyValueStore;
//! use coin_ledger::{CoinLedger, UserId};
//! use mockable::DefaultClock;
//!
//! let ledger = CoinLedger::new(Arc::new(InMemoryKeyValueStore::default()), Arc::new(DefaultClock));
//! let user = UserId::new("traveller-1").expect("valid user id");
//!
//! ledger.credit(&user, 100, "Posted a travel update", None).expect("credit succeeds");
//! assert!(ledger.purchase(&user, "Vintage Filter Pack", 100).expect("purchase runs"));
//! assert_eq!(ledger.get_account(&user).balance, 0);
//! ```

pub mod account;
pub mod cli;
pub mod config;
mod error;
pub mod ledger;
mod listeners;
pub mod notice;
pub mod outbound;
pub mod ports;
pub mod rewards;
pub mod shop;

pub use account::{
    Account, COINS_STORAGE_KEY, MAX_BALANCE, Transaction, TransactionId, TransactionKind, UserId,
};
pub use config::LedgerSettings;
pub use error::{LedgerError, ValidationError};
pub use ledger::{COIN_UPDATE_EVENT, CoinLedger, CreditReceipt};
pub use listeners::{CoinUpdate, CoinUpdateListener, SubscriptionId};
pub use notice::{Notice, NoticeSeverity};
