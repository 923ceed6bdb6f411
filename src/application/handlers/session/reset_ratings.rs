//! ResetRatingsHandler - Command handler for clearing every topic's ratings.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent, SessionId, TopicId};
use crate::domain::session::{Session, SessionError, TopicUpdated};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to clear the ratings of all topics in a session.
#[derive(Debug, Clone)]
pub struct ResetRatingsCommand {
    pub session_id: SessionId,
}

/// Result of a committed reset.
#[derive(Debug, Clone)]
pub struct ResetRatingsResult {
    pub session: Session,
    pub events: Vec<TopicUpdated>,
}

/// Handler for resetting ratings.
pub struct ResetRatingsHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ResetRatingsHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ResetRatingsCommand,
        metadata: CommandMetadata,
    ) -> Result<ResetRatingsResult, SessionError> {
        let mut changed: Vec<TopicId> = Vec::new();

        let session = self
            .repository
            .update_with(&cmd.session_id, &mut |session: &mut Session| {
                changed = session.reset_ratings();
                Ok(())
            })
            .await?;

        let events: Vec<TopicUpdated> = changed
            .iter()
            .filter_map(|id| session.topic(id))
            .map(|topic| TopicUpdated::new(cmd.session_id, topic.clone()))
            .collect();

        let correlation_id = metadata.correlation_id();
        let envelopes = events
            .iter()
            .map(|event| event.to_envelope().with_correlation_id(correlation_id.clone()))
            .collect();
        self.event_publisher.publish_all(envelopes).await?;

        info!(
            session = %cmd.session_id,
            correlation_id = %correlation_id,
            topics = events.len(),
            "ratings reset"
        );

        Ok(ResetRatingsResult { session, events })
    }
}
