//! Session domain events.
//!
//! `TopicUpdated` is published whenever a topic of a session changes:
//! the optimizer moving it, or a reset clearing its attendees or ratings.
//! Subscribers are grouped by session, so the session is the aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp};

use super::Topic;

// ════════════════════════════════════════════════════════════════════════════
// TopicUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published with a full snapshot of a topic after it changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicUpdated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Session the topic belongs to.
    pub session_id: SessionId,

    /// Topic state right after the change.
    pub topic: Topic,

    /// When the change happened.
    pub updated_at: Timestamp,
}

impl TopicUpdated {
    /// Creates an event for the given topic snapshot.
    pub fn new(session_id: SessionId, topic: Topic) -> Self {
        Self {
            event_id: EventId::new(),
            session_id,
            topic,
            updated_at: Timestamp::now(),
        }
    }
}

domain_event!(
    TopicUpdated,
    event_type = "topic.updated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = updated_at,
    event_id = event_id
);
