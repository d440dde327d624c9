//! The coin ledger service.
//!
//! [`CoinLedger`] is the only component that writes coin data. It keeps the
//! whole user-to-account mapping in one store slot, rewrites that slot in full
//! on every mutation, and notifies subscribers once the write has landed.
//! Entries belonging to other users are written back exactly as they were
//! read, including ones this crate cannot decode.
//!
//! Credits and debits fail differently on purpose: a credit that would push
//! the balance past the cap is clamped and still succeeds, while a debit that
//! would take the balance below zero is rejected without touching state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::account::{
    Account, COINS_STORAGE_KEY, MAX_BALANCE, Transaction, TransactionId, TransactionKind, UserId,
};
use crate::error::{LedgerError, ValidationError};
use crate::listeners::{CoinUpdate, ListenerRegistry, SubscriptionId};
use crate::notice::Notice;
use crate::ports::{KeyValueStore, KeyValueStoreError};

/// Name of the change-notification channel, for adapters that bridge
/// [`CoinUpdate`]s onto an external event bus.
pub const COIN_UPDATE_EVENT: &str = "traveller_connect_coin_update";

/// Raw stored mapping. Entries are decoded one user at a time so a record the
/// ledger cannot read never hides its siblings.
type AccountSlot = Map<String, Value>;

/// Result of a successful credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditReceipt {
    /// Account state after the credit.
    pub account: Account,
    /// Coins the caller asked for.
    pub requested: u32,
    /// Coins actually credited after clamping at the cap.
    pub applied: u32,
}

impl CreditReceipt {
    /// Returns `true` when the credit was reduced by the balance cap.
    #[must_use]
    pub const fn cap_reached(&self) -> bool {
        self.applied < self.requested
    }

    /// Notices to surface for this credit.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if self.applied > 0 {
            notices.push(Notice::Earned {
                amount: self.applied,
            });
        }
        if self.cap_reached() {
            notices.push(Notice::BalanceAtMaximum);
        }
        notices
    }
}

/// Authoritative owner of every user's coin balance and history.
///
/// Mutations are serialised within the process; callbacks registered with
/// [`CoinLedger::subscribe`] run after the write completes and may call back
/// into the ledger.
pub struct CoinLedger<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    storage_key: String,
    max_balance: u32,
    write_lock: Mutex<()>,
    listeners: Mutex<ListenerRegistry>,
}

impl<S> CoinLedger<S> {
    /// Create a ledger over `store`, stamping transactions with `clock`.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use coin_ledger::outbound::InMemoryKeyValueStore;
    /// use coin_ledger::{CoinLedger, MAX_BALANCE};
    /// use mockable::DefaultClock;
    ///
    /// let ledger = CoinLedger::new(Arc::new(InMemoryKeyValueStore::default()), Arc::new(DefaultClock));
    /// assert_eq!(ledger.max_balance(), MAX_BALANCE);
    /// ```
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            storage_key: COINS_STORAGE_KEY.to_owned(),
            max_balance: MAX_BALANCE,
            write_lock: Mutex::new(()),
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    /// Use a different store slot for the account mapping.
    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    /// Override the balance cap.
    #[must_use]
    pub const fn with_max_balance(mut self, max_balance: u32) -> Self {
        self.max_balance = max_balance;
        self
    }

    /// Balance cap enforced on credits.
    #[must_use]
    pub const fn max_balance(&self) -> u32 {
        self.max_balance
    }

    /// Store slot holding the account mapping.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Register `listener` for changes to `user_id`'s account.
    pub fn subscribe<F>(&self, user_id: UserId, listener: F) -> SubscriptionId
    where
        F: Fn(&CoinUpdate) + Send + Sync + 'static,
    {
        self.lock_listeners().subscribe(user_id, Arc::new(listener))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_listeners().unsubscribe(id)
    }

    /// Number of live subscriptions across all users.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn lock_listeners(&self) -> MutexGuard<'_, ListenerRegistry> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, user_id: &UserId) {
        let listeners = self.lock_listeners().listeners_for(user_id);
        let update = CoinUpdate {
            user_id: user_id.clone(),
        };
        for listener in listeners {
            listener(&update);
        }
    }

    fn transaction(
        &self,
        kind: TransactionKind,
        user_id: &UserId,
        amount: i64,
        description: &str,
        related_post_id: Option<String>,
    ) -> Transaction {
        Transaction {
            id: TransactionId::generate(kind),
            user_id: user_id.clone(),
            amount,
            description: description.to_owned(),
            timestamp: self.clock.utc(),
            related_post_id,
        }
    }
}

impl<S> CoinLedger<S>
where
    S: KeyValueStore,
{
    /// Read `user_id`'s account.
    ///
    /// Users without a stored record read as [`Account::opened`]. Unreadable
    /// or corrupt store contents are logged and also read as a fresh account.
    pub fn get_account(&self, user_id: &UserId) -> Account {
        match self.load_slot() {
            Ok(slot) => self.account_in(&slot, user_id),
            Err(error) => {
                warn!(%error, user_id = %user_id, "coin store read failed; using empty account");
                Account::opened(user_id.clone())
            }
        }
    }

    /// Credit `amount` coins to `user_id`.
    ///
    /// A credit that would exceed the cap is clamped so the balance lands
    /// exactly on it; the recorded transaction carries the clamped amount.
    /// When the account is already at the cap nothing is recorded and no
    /// notification fires.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for a zero amount or blank
    /// description, and [`LedgerError::Store`] when the store fails.
    pub fn credit(
        &self,
        user_id: &UserId,
        amount: u32,
        description: &str,
        related_post_id: Option<String>,
    ) -> Result<CreditReceipt, LedgerError> {
        self.credit_as(
            TransactionKind::Credit,
            user_id,
            amount,
            description,
            related_post_id,
        )
    }

    /// Credit as [`CoinLedger::credit`] does, tagging the transaction id with
    /// `kind`.
    pub(crate) fn credit_as(
        &self,
        kind: TransactionKind,
        user_id: &UserId,
        amount: u32,
        description: &str,
        related_post_id: Option<String>,
    ) -> Result<CreditReceipt, LedgerError> {
        ensure_positive(amount)?;
        ensure_described(description)?;

        let receipt = {
            let _guard = self.lock_writes();
            let mut slot = self.load_slot()?;
            let mut account = self.account_in(&slot, user_id);
            let applied = amount.min(self.max_balance.saturating_sub(account.balance));
            if applied == 0 {
                info!(user_id = %user_id, requested = amount, "credit skipped at balance cap");
                return Ok(CreditReceipt {
                    account,
                    requested: amount,
                    applied,
                });
            }
            if applied < amount {
                info!(user_id = %user_id, requested = amount, applied, "credit clamped at balance cap");
            }

            let balance = account.balance.saturating_add(applied);
            let transaction = self.transaction(
                kind,
                user_id,
                i64::from(applied),
                description,
                related_post_id,
            );
            account.record(transaction, balance);
            self.persist(&mut slot, &account)?;
            debug!(user_id = %user_id, applied, balance, "coins credited");
            CreditReceipt {
                account,
                requested: amount,
                applied,
            }
        };

        self.notify(user_id);
        Ok(receipt)
    }

    /// Debit `amount` coins from `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] when the balance is lower
    /// than `amount`; the account is left untouched. Validation and store
    /// failures are reported as for [`CoinLedger::credit`].
    pub fn debit(
        &self,
        user_id: &UserId,
        amount: u32,
        description: &str,
    ) -> Result<Account, LedgerError> {
        self.debit_as(TransactionKind::Debit, user_id, amount, description)
    }

    /// Buy `item_name` for `price` coins.
    ///
    /// Returns `Ok(false)` when the user cannot afford the item; that is a
    /// routine outcome rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for a zero price or blank item
    /// name, and [`LedgerError::Store`] when the store fails.
    pub fn purchase(
        &self,
        user_id: &UserId,
        item_name: &str,
        price: u32,
    ) -> Result<bool, LedgerError> {
        if item_name.trim().is_empty() {
            return Err(ValidationError::BlankItemName.into());
        }
        let description = format!("Purchased {item_name}");
        match self.debit_as(TransactionKind::Purchase, user_id, price, &description) {
            Ok(_) => Ok(true),
            Err(LedgerError::InsufficientFunds { balance, requested }) => {
                info!(user_id = %user_id, item = item_name, balance, requested, "purchase rejected");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    fn debit_as(
        &self,
        kind: TransactionKind,
        user_id: &UserId,
        amount: u32,
        description: &str,
    ) -> Result<Account, LedgerError> {
        ensure_positive(amount)?;
        ensure_described(description)?;

        let account = {
            let _guard = self.lock_writes();
            let mut slot = self.load_slot()?;
            let mut account = self.account_in(&slot, user_id);
            let Some(balance) = account.balance.checked_sub(amount) else {
                return Err(LedgerError::InsufficientFunds {
                    balance: account.balance,
                    requested: amount,
                });
            };

            let transaction =
                self.transaction(kind, user_id, -i64::from(amount), description, None);
            account.record(transaction, balance);
            self.persist(&mut slot, &account)?;
            debug!(user_id = %user_id, amount, balance, "coins debited");
            account
        };

        self.notify(user_id);
        Ok(account)
    }

    fn load_slot(&self) -> Result<AccountSlot, KeyValueStoreError> {
        let Some(bytes) = self.store.get(&self.storage_key)? else {
            return Ok(AccountSlot::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(slot) => Ok(slot),
            Err(error) => {
                warn!(%error, key = %self.storage_key, "discarding unreadable coin data");
                Ok(AccountSlot::new())
            }
        }
    }

    fn account_in(&self, slot: &AccountSlot, user_id: &UserId) -> Account {
        let Some(value) = slot.get(user_id.as_ref()) else {
            return Account::opened(user_id.clone());
        };
        match Account::deserialize(value) {
            Ok(account) => account,
            Err(error) => {
                warn!(%error, user_id = %user_id, key = %self.storage_key, "unreadable coin account; starting afresh");
                Account::opened(user_id.clone())
            }
        }
    }

    fn persist(&self, slot: &mut AccountSlot, account: &Account) -> Result<(), LedgerError> {
        let entry = serde_json::to_value(account).map_err(serialization_error)?;
        slot.insert(account.user_id.to_string(), entry);
        let bytes = serde_json::to_vec(slot).map_err(serialization_error)?;
        self.store.set(&self.storage_key, &bytes)?;
        Ok(())
    }
}

fn serialization_error(error: serde_json::Error) -> LedgerError {
    LedgerError::Serialization {
        message: error.to_string(),
    }
}

const fn ensure_positive(amount: u32) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::NonPositiveAmount { amount });
    }
    Ok(())
}

fn ensure_described(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::BlankDescription);
    }
    Ok(())
}
