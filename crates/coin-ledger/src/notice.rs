//! Transient user-facing notices describing ledger outcomes.
//!
//! Notices stay presentation agnostic: adapters decide whether they become a
//! toast, a terminal line, or a log entry.

use std::fmt;

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeSeverity {
    /// Neutral information.
    Info,
    /// A completed action.
    Success,
    /// A rejected action.
    Error,
}

/// Outcome message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Coins were credited.
    Earned {
        /// Coins actually credited after clamping.
        amount: u32,
    },
    /// A credit was clamped at the balance cap.
    BalanceAtMaximum,
    /// A shop purchase went through.
    Purchased {
        /// Item title.
        item: String,
    },
    /// A shop purchase was rejected for lack of coins.
    InsufficientCoins {
        /// Item title.
        item: String,
    },
}

impl Notice {
    /// Machine-readable notice code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Earned { .. } => "coins_earned",
            Self::BalanceAtMaximum => "balance_at_maximum",
            Self::Purchased { .. } => "purchase_succeeded",
            Self::InsufficientCoins { .. } => "insufficient_coins",
        }
    }

    /// Display severity.
    #[must_use]
    pub const fn severity(&self) -> NoticeSeverity {
        match self {
            Self::Earned { .. } | Self::Purchased { .. } => NoticeSeverity::Success,
            Self::BalanceAtMaximum => NoticeSeverity::Info,
            Self::InsufficientCoins { .. } => NoticeSeverity::Error,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Earned { amount } => format!("You earned {amount} coins!"),
            Self::BalanceAtMaximum => "You've reached the maximum coin balance!".to_owned(),
            Self::Purchased { item } => format!("Successfully purchased {item}"),
            Self::InsufficientCoins { item } => format!("Not enough coins to purchase {item}"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::earned(Notice::Earned { amount: 100 }, NoticeSeverity::Success, "You earned 100 coins!")]
    #[case::cap(
        Notice::BalanceAtMaximum,
        NoticeSeverity::Info,
        "You've reached the maximum coin balance!"
    )]
    #[case::purchased(
        Notice::Purchased { item: "Priority Support".to_owned() },
        NoticeSeverity::Success,
        "Successfully purchased Priority Support"
    )]
    #[case::insufficient(
        Notice::InsufficientCoins { item: "Priority Support".to_owned() },
        NoticeSeverity::Error,
        "Not enough coins to purchase Priority Support"
    )]
    fn notices_map_to_severity_and_message(
        #[case] notice: Notice,
        #[case] severity: NoticeSeverity,
        #[case] message: &str,
    ) {
        assert_eq!(notice.severity(), severity);
        assert_eq!(notice.to_string(), message);
    }

    #[rstest]
    fn codes_are_stable() {
        assert_eq!(Notice::BalanceAtMaximum.code(), "balance_at_maximum");
        assert_eq!(Notice::Earned { amount: 1 }.code(), "coins_earned");
    }
}
