//! Per-user change subscriptions.
//!
//! Notifications carry only the affected [`UserId`]; listeners re-read the
//! account through the ledger rather than receiving a delta.

use std::sync::Arc;

use crate::account::UserId;

/// Payload delivered to listeners after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinUpdate {
    /// Account that changed.
    pub user_id: UserId,
}

/// Callback invoked with each [`CoinUpdate`] for the subscribed user.
pub type CoinUpdateListener = Arc<dyn Fn(&CoinUpdate) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    user_id: UserId,
    listener: CoinUpdateListener,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(
        &mut self,
        user_id: UserId,
        listener: CoinUpdateListener,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscriptions.push(Subscription {
            id,
            user_id,
            listener,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Listeners registered for `user_id`, cloned so they can run unlocked.
    pub(crate) fn listeners_for(&self, user_id: &UserId) -> Vec<CoinUpdateListener> {
        self.subscriptions
            .iter()
            .filter(|subscription| &subscription.user_id == user_id)
            .map(|subscription| Arc::clone(&subscription.listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn user(raw: &str) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    #[test]
    fn listeners_are_filtered_by_user() {
        let mut registry = ListenerRegistry::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.subscribe(
            user("alice"),
            Arc::new(move |_: &CoinUpdate| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        registry.subscribe(user("bob"), Arc::new(|_: &CoinUpdate| {}));

        let update = CoinUpdate {
            user_id: user("alice"),
        };
        for listener in registry.listeners_for(&update.user_id) {
            listener(&update);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unsubscribe_removes_only_the_matching_subscription() {
        let mut registry = ListenerRegistry::default();
        let first = registry.subscribe(user("alice"), Arc::new(|_: &CoinUpdate| {}));
        let second = registry.subscribe(user("alice"), Arc::new(|_: &CoinUpdate| {}));
        assert_ne!(first, second);

        assert!(registry.unsubscribe(first));
        assert!(!registry.unsubscribe(first));
        assert_eq!(registry.listeners_for(&user("alice")).len(), 1);
    }
}
