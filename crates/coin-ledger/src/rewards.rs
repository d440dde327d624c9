//! Coin rewards granted by the travel feed.

use crate::account::{TransactionKind, UserId};
use crate::error::LedgerError;
use crate::ledger::{CoinLedger, CreditReceipt};
use crate::ports::KeyValueStore;

/// Coins granted for publishing a travel update.
pub const POST_REWARD: u32 = 100;

/// Transaction description recorded for post rewards.
pub const POST_REWARD_DESCRIPTION: &str = "Posted a travel update";

/// Reward `user_id` for publishing the post `post_id`.
///
/// # Errors
///
/// Propagates [`LedgerError`] from [`CoinLedger::credit`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use coin_ledger::outbound::InMemoryKeyValueStore;
/// use coin_ledger::rewards::award_post;
/// use coin_ledger::{CoinLedger, UserId};
/// use mockable::DefaultClock;
///
/// let ledger = CoinLedger::new(Arc::new(InMemoryKeyValueStore::default()), Arc::new(DefaultClock));
/// let user = UserId::new("traveller-1").expect("valid user id");
///
/// let receipt = award_post(&ledger, &user, "post-1").expect("reward granted");
/// assert_eq!(receipt.account.balance, 100);
/// ```
pub fn award_post<S: KeyValueStore>(
    ledger: &CoinLedger<S>,
    user_id: &UserId,
    post_id: impl Into<String>,
) -> Result<CreditReceipt, LedgerError> {
    ledger.credit_as(
        TransactionKind::Award,
        user_id,
        POST_REWARD,
        POST_REWARD_DESCRIPTION,
        Some(post_id.into()),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::account::MAX_BALANCE;
    use crate::notice::Notice;
    use crate::outbound::InMemoryKeyValueStore;

    #[rstest]
    fn post_reward_links_back_to_post() {
        let ledger = CoinLedger::new(
            Arc::new(InMemoryKeyValueStore::default()),
            Arc::new(DefaultClock),
        );
        let user = UserId::new("traveller-1").expect("valid user id");

        let receipt = award_post(&ledger, &user, "post-42").expect("reward granted");

        let head = receipt.account.latest().expect("reward recorded");
        assert_eq!(head.amount, 100);
        assert_eq!(head.description, POST_REWARD_DESCRIPTION);
        assert_eq!(head.related_post_id.as_deref(), Some("post-42"));
        assert!(head.id.as_ref().starts_with("award-"));
        assert_eq!(receipt.notices(), vec![Notice::Earned { amount: 100 }]);
    }

    #[rstest]
    fn eleventh_post_hits_the_cap() {
        let ledger = CoinLedger::new(
            Arc::new(InMemoryKeyValueStore::default()),
            Arc::new(DefaultClock),
        );
        let user = UserId::new("traveller-1").expect("valid user id");
        for index in 0..10 {
            award_post(&ledger, &user, format!("post-{index}")).expect("reward granted");
        }

        let receipt = award_post(&ledger, &user, "post-10").expect("reward call succeeds");

        assert_eq!(receipt.account.balance, MAX_BALANCE);
        assert_eq!(receipt.applied, 0);
        assert_eq!(receipt.notices(), vec![Notice::BalanceAtMaximum]);
    }
}
