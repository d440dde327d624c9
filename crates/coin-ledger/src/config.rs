//! Ledger configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::account::{COINS_STORAGE_KEY, MAX_BALANCE};

const DEFAULT_STORE_DIR: &str = ".traveller-connect";

/// Settings for wiring a [`CoinLedger`](crate::CoinLedger) to durable storage.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COIN_LEDGER")]
pub struct LedgerSettings {
    /// Directory holding the file-backed store.
    pub store_dir: Option<PathBuf>,
    /// Store slot for the user-to-account mapping.
    pub storage_key: Option<String>,
    /// Balance cap enforced on credits.
    #[ortho_config(default = 1000)]
    pub max_balance: u32,
}

impl LedgerSettings {
    /// Configured store directory, falling back to `.traveller-connect`.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
    }

    /// Configured storage key, falling back to [`COINS_STORAGE_KEY`].
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(COINS_STORAGE_KEY)
    }

    /// Configured balance cap, [`MAX_BALANCE`] unless overridden.
    #[must_use]
    pub const fn max_balance(&self) -> u32 {
        self.max_balance
    }
}
