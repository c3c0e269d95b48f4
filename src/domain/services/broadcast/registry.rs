use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{DeliveryChannel, SubscriberId};

type Subscribers = HashMap<SubscriberId, Arc<dyn DeliveryChannel>>;

/// Maps a match id to the channels currently subscribed to it.
///
/// Publishers take a snapshot of a match's subscribers and iterate it outside
/// the lock, so connect/disconnect never waits on a slow delivery.
#[derive(Default)]
pub struct SubscriptionRegistry {
    matches: RwLock<HashMap<Uuid, Subscribers>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a channel for a match.
    ///
    /// # Returns
    /// The id the channel was registered under
    pub fn subscribe(&self, match_id: Uuid, channel: Arc<dyn DeliveryChannel>) -> SubscriberId {
        let subscriber_id = channel.id();
        let mut matches = self.matches.write();
        let subscribers = matches.entry(match_id).or_default();
        subscribers.insert(subscriber_id, channel);
        debug!(
            "Subscriber {} joined match {} (total: {})",
            subscriber_id,
            match_id,
            subscribers.len()
        );
        subscriber_id
    }

    /// Removes a channel from a match. Empty matches are dropped from the map.
    ///
    /// # Returns
    /// Whether the subscriber was registered
    pub fn unsubscribe(&self, match_id: Uuid, subscriber_id: SubscriberId) -> bool {
        let mut matches = self.matches.write();
        let Some(subscribers) = matches.get_mut(&match_id) else {
            return false;
        };
        let removed = subscribers.remove(&subscriber_id).is_some();
        if subscribers.is_empty() {
            matches.remove(&match_id);
        }
        if removed {
            debug!("Subscriber {} left match {}", subscriber_id, match_id);
        }
        removed
    }

    /// Registers a channel and ties its membership to the returned guard.
    pub fn attach(
        self: &Arc<Self>,
        match_id: Uuid,
        channel: Arc<dyn DeliveryChannel>,
    ) -> SubscriptionGuard {
        let subscriber_id = self.subscribe(match_id, channel);
        SubscriptionGuard {
            registry: Arc::downgrade(self),
            match_id,
            subscriber_id,
        }
    }

    /// Current subscribers of a match.
    pub fn snapshot(&self, match_id: Uuid) -> Vec<Arc<dyn DeliveryChannel>> {
        self.matches
            .read()
            .get(&match_id)
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, match_id: Uuid) -> usize {
        self.matches.read().get(&match_id).map_or(0, HashMap::len)
    }

    /// Number of matches with at least one subscriber.
    pub fn match_count(&self) -> usize {
        self.matches.read().len()
    }
}

/// Keeps a subscription alive; dropping it unsubscribes the channel.
pub struct SubscriptionGuard {
    registry: Weak<SubscriptionRegistry>,
    match_id: Uuid,
    subscriber_id: SubscriberId,
}

impl SubscriptionGuard {
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.match_id, self.subscriber_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::broadcast::DeliveryError;
    use crate::domain::services::payloads::Frame;
    use async_trait::async_trait;

    struct NullChannel(SubscriberId);

    #[async_trait]
    impl DeliveryChannel for NullChannel {
        fn id(&self) -> SubscriberId {
            self.0
        }

        async fn deliver(&self, _frame: Frame) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    fn channel() -> Arc<dyn DeliveryChannel> {
        Arc::new(NullChannel(Uuid::new_v4()))
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let registry = SubscriptionRegistry::new();
        let match_id = Uuid::new_v4();

        let first = registry.subscribe(match_id, channel());
        let second = registry.subscribe(match_id, channel());
        registry.subscribe(Uuid::new_v4(), channel());

        assert_eq!(registry.subscriber_count(match_id), 2);
        assert_eq!(registry.match_count(), 2);

        assert!(registry.unsubscribe(match_id, first));
        assert!(!registry.unsubscribe(match_id, first));
        assert_eq!(registry.snapshot(match_id).len(), 1);

        assert!(registry.unsubscribe(match_id, second));
        assert_eq!(registry.subscriber_count(match_id), 0);
        assert_eq!(registry.match_count(), 1);
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let match_id = Uuid::new_v4();

        let guard = registry.attach(match_id, channel());
        assert_eq!(guard.match_id(), match_id);
        assert_eq!(registry.subscriber_count(match_id), 1);

        drop(guard);
        assert_eq!(registry.subscriber_count(match_id), 0);
        assert_eq!(registry.match_count(), 0);
    }

    #[test]
    fn test_concurrent_membership_changes() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let match_id = Uuid::new_v4();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let id = registry.subscribe(match_id, channel());
                        let _ = registry.snapshot(match_id);
                        assert!(registry.unsubscribe(match_id, id));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.subscriber_count(match_id), 0);
    }
}
