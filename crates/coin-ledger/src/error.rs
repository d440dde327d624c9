//! Error types for the coin ledger.
//!
//! Validation failures are raised before any state is touched, so a failed
//! operation never leaves a partially applied change behind.

use thiserror::Error;

use crate::ports::KeyValueStoreError;

/// Malformed input rejected by the ledger or its value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// User identifiers must contain at least one character.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// Credits, debits, and prices must be strictly positive.
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: u32,
    },
    /// Every transaction needs a human-readable reason.
    #[error("transaction description must not be blank")]
    BlankDescription,
    /// Purchased items must be named.
    #[error("item name must not be blank")]
    BlankItemName,
}

/// Failures surfaced by ledger mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The request was malformed.
    #[error("invalid ledger request: {0}")]
    Validation(#[from] ValidationError),
    /// A debit asked for more coins than the account holds.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the request.
        balance: u32,
        /// Amount the caller tried to debit.
        requested: u32,
    },
    /// The backing store could not be read or written.
    #[error("coin store failure: {0}")]
    Store(#[from] KeyValueStoreError),
    /// The account mapping could not be encoded for storage.
    #[error("failed to encode coin data: {message}")]
    Serialization {
        /// Encoder failure description.
        message: String,
    },
}

impl LedgerError {
    /// Returns `true` when the error is an insufficient-funds rejection.
    #[must_use]
    pub const fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error formatting.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(ValidationError::EmptyUserId, "user id must not be empty")]
    #[case::amount(
        ValidationError::NonPositiveAmount { amount: 0 },
        "amount must be positive, got 0"
    )]
    #[case::description(
        ValidationError::BlankDescription,
        "transaction description must not be blank"
    )]
    fn validation_errors_format(#[case] error: ValidationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn insufficient_funds_reports_both_amounts() {
        let error = LedgerError::InsufficientFunds {
            balance: 30,
            requested: 50,
        };
        assert_eq!(
            error.to_string(),
            "insufficient funds: balance 30, requested 50"
        );
        assert!(error.is_insufficient_funds());
    }

    #[test]
    fn store_errors_wrap_port_errors() {
        let error = LedgerError::from(KeyValueStoreError::io("disk full"));
        assert_eq!(error.to_string(), "coin store failure: store i/o failed: disk full");
        assert!(!error.is_insufficient_funds());
    }
}
