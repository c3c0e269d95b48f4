use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::services::payloads::Payload;

use super::{BroadcastError, DeliveryError, SubscriptionRegistry};

/// Outcome of a single publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Subscribers that accepted the frame.
    pub delivered: usize,
    /// Subscribers that failed or timed out and were unsubscribed.
    pub dropped: usize,
}

/// Delivers payloads to every subscriber of a match.
///
/// Owns no business logic: it serializes once, snapshots the registry and fans
/// out concurrently, bounding each delivery by `delivery_timeout`.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriptionRegistry>,
    delivery_timeout: Duration,
}

impl Broadcaster {
    /// Creates a broadcaster over a shared registry.
    ///
    /// # Arguments
    /// * `registry` - Registry shared with the connection-handling layer
    /// * `delivery_timeout` - Upper bound for a single subscriber to accept a frame
    pub fn new(registry: Arc<SubscriptionRegistry>, delivery_timeout: Duration) -> Self {
        Self { registry, delivery_timeout }
    }

    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Publishes a payload to every channel currently subscribed to `match_id`.
    ///
    /// Delivery failures never fail the publish: the failing subscriber is logged
    /// and removed from the registry. With no subscribers this is a no-op.
    ///
    /// # Returns
    /// * `Ok(PublishReport)` - Delivered and dropped counts
    /// * `Err(BroadcastError)` - If the payload could not be serialized
    pub async fn publish(
        &self,
        match_id: Uuid,
        payload: &Payload,
    ) -> Result<PublishReport, BroadcastError> {
        let subscribers = self.registry.snapshot(match_id);
        if subscribers.is_empty() {
            debug!("No subscribers for {} on match {}", payload.type_name(), match_id);
            return Ok(PublishReport::default());
        }

        let frame = payload.to_frame()?;
        let deliveries = subscribers.into_iter().map(|channel| {
            let frame = Arc::clone(&frame);
            let limit = self.delivery_timeout;
            async move {
                let result = match timeout(limit, channel.deliver(frame)).await {
                    Ok(result) => result,
                    Err(_) => Err(DeliveryError::Timeout(limit)),
                };
                (channel.id(), result)
            }
        });

        let mut report = PublishReport::default();
        for (subscriber_id, result) in join_all(deliveries).await {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(
                        "Dropping subscriber {} of match {}: {}",
                        subscriber_id, match_id, e
                    );
                    self.registry.unsubscribe(match_id, subscriber_id);
                    report.dropped += 1;
                }
            }
        }

        debug!(
            "Published {} to match {} (delivered: {}, dropped: {})",
            payload.type_name(),
            match_id,
            report.delivered,
            report.dropped
        );
        Ok(report)
    }
}
