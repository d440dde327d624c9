//! Error types for the ledger CLI.

use thiserror::Error;

use crate::error::{LedgerError, ValidationError};
use crate::ports::KeyValueStoreError;
use crate::shop::ShopError;

/// Errors surfaced by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// No `--user` flag was supplied.
    #[error("missing required flag: --user")]
    MissingUser,
    /// The supplied user id was malformed.
    #[error("invalid user id: {0}")]
    InvalidUser(#[from] ValidationError),
    /// Settings could not be loaded.
    #[error("configuration error: {message}")]
    Config {
        /// Loader error message.
        message: String,
    },
    /// The store directory could not be opened.
    #[error("coin store error: {0}")]
    Store(#[from] KeyValueStoreError),
    /// The ledger rejected the operation.
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    /// The requested shop item does not exist.
    #[error("{0}")]
    Shop(#[from] ShopError),
    /// Writing to stdout failed.
    #[error("failed to write output: {message}")]
    Output {
        /// I/O error message.
        message: String,
    },
}
