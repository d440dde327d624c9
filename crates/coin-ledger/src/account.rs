//! Coin account data model.
//!
//! An [`Account`] pairs a balance with the newest-first history of the
//! [`Transaction`]s that produced it. Both serialise with camelCase keys so
//! the persisted mapping keeps the layout the web client already stores.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Upper bound on any account balance.
pub const MAX_BALANCE: u32 = 1000;

/// Name of the store slot holding the user-to-account mapping.
pub const COINS_STORAGE_KEY: &str = "traveller_connect_coins";

/// Opaque, stable user identifier.
///
/// # Examples
/// ```
/// use coin_ledger::{UserId, ValidationError};
///
/// let id = UserId::new("traveller-42").expect("valid id");
/// assert_eq!(id.as_ref(), "traveller-42");
/// assert_eq!(UserId::new(""), Err(ValidationError::EmptyUserId));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUserId`] for an empty string. Any
    /// other content is accepted verbatim, whitespace included.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = id.into();
        if raw.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Direction of a balance change, used to prefix transaction ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Coins earned for publishing a post.
    Award,
    /// Coins credited for any other reason.
    Credit,
    /// Coins spent in the shop.
    Purchase,
    /// Coins removed outside the shop flow.
    Debit,
}

impl TransactionKind {
    /// Id prefix for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::Credit => "credit",
            Self::Purchase => "purchase",
            Self::Debit => "debit",
        }
    }
}

/// Unique transaction identifier of the form `<kind>-<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh identifier for a transaction of `kind`.
    #[must_use]
    pub fn generate(kind: TransactionKind) -> Self {
        Self(format!("{}-{}", kind.as_str(), Uuid::new_v4()))
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable record of a single balance change.
///
/// `amount` is positive for credits and negative for debits; the ledger never
/// records a zero amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique id within the owning account.
    pub id: TransactionId,
    /// Owning account.
    pub user_id: UserId,
    /// Signed coin delta.
    pub amount: i64,
    /// Human-readable reason.
    pub description: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// Post that triggered a credit, if any. Not checked for existence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_post_id: Option<String>,
}

impl Transaction {
    /// Returns `true` for coins earned.
    #[must_use]
    pub const fn is_credit(&self) -> bool {
        self.amount > 0
    }
}

/// Per-user balance and transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account owner.
    pub user_id: UserId,
    /// Current balance, within `0..=MAX_BALANCE`.
    pub balance: u32,
    /// History, newest first.
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// The account every user starts with: zero balance and no history.
    ///
    /// Accounts are never created explicitly. A user without a stored record
    /// reads as this value until their first mutation persists it.
    #[must_use]
    pub const fn opened(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0,
            transactions: Vec::new(),
        }
    }

    /// Most recent transaction, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    pub(crate) fn record(&mut self, transaction: Transaction, balance: u32) {
        self.transactions.insert(0, transaction);
        self.balance = balance;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the account model.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn user() -> UserId {
        UserId::new("traveller-1").expect("valid user id")
    }

    #[rstest]
    fn user_id_rejects_empty_input() {
        assert_eq!(UserId::new(""), Err(ValidationError::EmptyUserId));
    }

    #[rstest]
    #[case::blank("   ")]
    #[case::padded(" traveller ")]
    #[case::email("someone@example.com")]
    fn user_id_is_otherwise_opaque(#[case] input: &str) {
        let id = UserId::new(input).expect("non-empty ids are accepted");
        assert_eq!(id.as_ref(), input);
    }

    #[rstest]
    fn user_id_deserialisation_validates() {
        let result: Result<UserId, _> = serde_json::from_value(json!(""));
        assert!(result.is_err());
    }

    #[rstest]
    fn opened_account_is_empty() {
        let account = Account::opened(user());
        assert_eq!(account.balance, 0);
        assert!(account.transactions.is_empty());
        assert!(account.latest().is_none());
    }

    #[rstest]
    #[case::award(TransactionKind::Award, "award-")]
    #[case::credit(TransactionKind::Credit, "credit-")]
    #[case::purchase(TransactionKind::Purchase, "purchase-")]
    #[case::debit(TransactionKind::Debit, "debit-")]
    fn transaction_ids_carry_kind_prefix(#[case] kind: TransactionKind, #[case] prefix: &str) {
        let first = TransactionId::generate(kind);
        let second = TransactionId::generate(kind);
        assert!(first.as_ref().starts_with(prefix));
        assert_ne!(first, second);
    }

    #[rstest]
    fn account_serialises_with_camel_case_keys() {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 4, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let mut account = Account::opened(user());
        account.record(
            Transaction {
                id: TransactionId("award-1".to_owned()),
                user_id: user(),
                amount: 100,
                description: "Posted a travel update".to_owned(),
                timestamp,
                related_post_id: Some("post-9".to_owned()),
            },
            100,
        );

        let value = serde_json::to_value(&account).expect("serialise account");
        assert_eq!(
            value,
            json!({
                "userId": "traveller-1",
                "balance": 100,
                "transactions": [{
                    "id": "award-1",
                    "userId": "traveller-1",
                    "amount": 100,
                    "description": "Posted a travel update",
                    "timestamp": "2025-04-01T09:30:00Z",
                    "relatedPostId": "post-9",
                }],
            })
        );
    }

    #[rstest]
    fn related_post_id_is_optional_on_read() {
        let value = json!({
            "id": "purchase-1",
            "userId": "traveller-1",
            "amount": -200,
            "description": "Purchased Ad-Free Experience",
            "timestamp": "2025-04-01T09:30:00.000Z",
        });
        let transaction: Transaction = serde_json::from_value(value).expect("parse transaction");
        assert!(transaction.related_post_id.is_none());
        assert!(!transaction.is_credit());
    }

    #[rstest]
    fn record_prepends_newest_transaction() {
        let mut account = Account::opened(user());
        for (index, amount) in [10_i64, 20, 30].into_iter().enumerate() {
            account.record(
                Transaction {
                    id: TransactionId(format!("award-{index}")),
                    user_id: user(),
                    amount,
                    description: "reward".to_owned(),
                    timestamp: Utc::now(),
                    related_post_id: None,
                },
                60,
            );
        }
        let amounts: Vec<i64> = account.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![30, 20, 10]);
    }
}
