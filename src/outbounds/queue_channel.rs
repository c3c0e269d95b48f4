use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::services::broadcast::{DeliveryChannel, DeliveryError, SubscriberId};
use crate::domain::services::payloads::Frame;

/// Delivery channel backed by a bounded queue.
///
/// The connection side owns the receiver and forwards frames to its transport
/// (the websocket writer task). A full queue makes `deliver` wait, which the
/// broadcaster bounds with its delivery timeout; a dropped receiver reports
/// `DeliveryError::Closed`.
pub struct QueueChannel {
    id: SubscriberId,
    sender: mpsc::Sender<Frame>,
}

impl QueueChannel {
    /// Creates a channel and the receiver its connection drains.
    ///
    /// # Arguments
    /// * `buffer` - Frames that may be queued before delivery waits
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { id: Uuid::new_v4(), sender }, receiver)
    }
}

#[async_trait]
impl DeliveryChannel for QueueChannel {
    fn id(&self) -> SubscriberId {
        self.id
    }

    async fn deliver(&self, frame: Frame) -> Result<(), DeliveryError> {
        self.sender.send(frame).await.map_err(|_| DeliveryError::Closed)
    }
}
