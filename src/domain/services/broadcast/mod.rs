//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Live fan-out of match notifications. The registry maps a match id to the channels currently
// connected for it; the broadcaster delivers one serialized frame to each of them.
//
// | Component            | Description                                                 |
// |----------------------|-------------------------------------------------------------|
// | DeliveryChannel      | Trait for a live delivery endpoint (e.g. a websocket)       |
// | SubscriptionRegistry | Concurrent match id -> subscribers map                      |
// | SubscriptionGuard    | Unsubscribes its channel when dropped                       |
// | Broadcaster          | Publishes a payload to every subscriber of a match          |
// | PublishReport        | Delivered/dropped counts of one publish                     |
//--------------------------------------------------------------------------------------------------

mod broadcaster;
mod registry;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::payloads::Frame;

pub use broadcaster::{Broadcaster, PublishReport};
pub use registry::{SubscriptionGuard, SubscriptionRegistry};

/// Identifier of one connected subscriber.
pub type SubscriberId = Uuid;

/// Errors that can occur delivering a frame to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The underlying connection is gone.
    #[error("Subscriber channel closed")]
    Closed,

    /// The subscriber did not accept the frame in time.
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors that fail a whole publish.
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A live delivery endpoint registered to receive notifications for one match.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn id(&self) -> SubscriberId;

    /// Hands a complete frame to the transport.
    async fn deliver(&self, frame: Frame) -> Result<(), DeliveryError>;
}
