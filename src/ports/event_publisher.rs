//! EventPublisher port - Interface for publishing domain events.
//!
//! The domain only produces events; delivery to subscribers (in-process
//! capture, per-session broadcast) is the adapter's business.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events of one `publish_all` call are delivered in order
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// let envelope = TopicUpdated::new(session_id, topic).to_envelope();
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Stops at the first failure; earlier events stay published.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
