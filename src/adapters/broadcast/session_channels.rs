//! Per-session fan-out of domain events.
//!
//! Subscribers join the channel of one session and receive every event
//! whose aggregate is that session.
//!
//! ```text
//! Channel: session-123    Channel: session-456
//! ├── subscriber-a        ├── subscriber-d
//! └── subscriber-b        └── subscriber-e
//! ```

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, SessionId};
use crate::ports::EventPublisher;

/// Identifies one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broadcast channels grouped by session.
///
/// A channel is created on first join and dropped once its last
/// subscriber leaves. Slow subscribers lose the oldest events when the
/// channel buffer overflows.
pub struct SessionChannels {
    channels: RwLock<HashMap<SessionId, broadcast::Sender<EventEnvelope>>>,
    subscribers: RwLock<HashMap<SubscriberId, SessionId>>,
    channel_capacity: usize,
}

impl SessionChannels {
    /// Creates channels buffering `channel_capacity` events each.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Joins the session's channel.
    pub async fn join(
        &self,
        session_id: &SessionId,
        subscriber: SubscriberId,
    ) -> broadcast::Receiver<EventEnvelope> {
        let mut channels = self.channels.write().await;
        let sender = channels.entry(*session_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.subscribers
            .write()
            .await
            .insert(subscriber, *session_id);

        sender.subscribe()
    }

    /// Leaves whatever channel the subscriber joined.
    ///
    /// Drop the receiver before leaving for the channel to be cleaned up.
    pub async fn leave(&self, subscriber: &SubscriberId) {
        let Some(session_id) = self.subscribers.write().await.remove(subscriber) else {
            return;
        };

        let mut channels = self.channels.write().await;
        if channels
            .get(&session_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&session_id);
        }
    }

    /// Sends an event to everyone in the session's channel.
    ///
    /// Returns how many subscribers received it.
    pub async fn broadcast_to_session(&self, session_id: &SessionId, event: EventEnvelope) -> usize {
        let channels = self.channels.read().await;
        match channels.get(session_id) {
            // No receivers is fine.
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub async fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.channels
            .read()
            .await
            .get(session_id)
            .map_or(0, |sender| sender.receiver_count())
    }

    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.channels.read().await.keys().copied().collect()
    }
}

impl Default for SessionChannels {
    fn default() -> Self {
        Self::new(128)
    }
}

#[async_trait]
impl EventPublisher for SessionChannels {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let session_id: SessionId = event.aggregate_id.parse().map_err(|_| {
            DomainError::new(
                ErrorCode::PublishFailed,
                format!(
                    "Event {} is not addressed to a session: '{}'",
                    event.event_type, event.aggregate_id
                ),
            )
        })?;

        let event_type = event.event_type.clone();
        let delivered = self.broadcast_to_session(&session_id, event).await;
        debug!(session = %session_id, event_type = %event_type, delivered, "broadcast event");
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
