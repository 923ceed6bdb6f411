//! ResetAttendancesHandler - Command handler for clearing every topic's attendees.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent, SessionId, TopicId};
use crate::domain::session::{Session, SessionError, TopicUpdated};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to clear the attendees of all topics in a session.
#[derive(Debug, Clone)]
pub struct ResetAttendancesCommand {
    pub session_id: SessionId,
}

/// Result of a committed reset.
#[derive(Debug, Clone)]
pub struct ResetAttendancesResult {
    pub session: Session,
    pub events: Vec<TopicUpdated>,
}

/// Handler for resetting attendances.
pub struct ResetAttendancesHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ResetAttendancesHandler {
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
        cmd: ResetAttendancesCommand,
        metadata: CommandMetadata,
    ) -> Result<ResetAttendancesResult, SessionError> {
        let mut changed: Vec<TopicId> = Vec::new();

        let session = self
            .repository
            .update_with(&cmd.session_id, &mut |session: &mut Session| {
                changed = session.reset_attendances();
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
            "attendances reset"
        );

        Ok(ResetAttendancesResult { session, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::mocks::{MockEventPublisher, MockSessionRepository};
    use crate::domain::session::Topic;

    fn test_session() -> Session {
        let mut session = Session::new(SessionId::new(), "Open Space").unwrap();
        session
            .add_topic(Topic::new(TopicId::new("t1").unwrap(), "Async").with_attendees(["ann", "bob"]))
            .unwrap();
        session
            .add_topic(Topic::new(TopicId::new("t2").unwrap(), "Macros"))
            .unwrap();
        session
            .add_topic(Topic::new(TopicId::new("t3").unwrap(), "Unsafe").with_attendees(["cy"]))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn clears_attendees_and_persists() {
        let session = test_session();
        let session_id = *session.id();
        let repo = Arc::new(MockSessionRepository::with_session(session));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = ResetAttendancesHandler::new(repo.clone(), publisher);

        let result = handler
            .handle(ResetAttendancesCommand { session_id }, CommandMetadata::new())
            .await
            .unwrap();

        let stored = repo.get_session(&session_id).unwrap();
        assert!(stored.topics().iter().all(|t| t.attendees().is_empty()));
        assert_eq!(stored, result.session);
    }

    #[tokio::test]
    async fn publishes_one_event_per_changed_topic() {
        let session = test_session();
        let session_id = *session.id();
        let repo = Arc::new(MockSessionRepository::with_session(session));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = ResetAttendancesHandler::new(repo, publisher.clone());

        handler
            .handle(
                ResetAttendancesCommand { session_id },
                CommandMetadata::new().with_correlation_id("reset-1"),
            )
            .await
            .unwrap();

        let events = publisher.published_events();
        let topics: Vec<_> = events
            .iter()
            .map(|e| e.payload["topic"]["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(topics, vec!["t1", "t3"]);
        assert!(events
            .iter()
            .all(|e| e.metadata.correlation_id.as_deref() == Some("reset-1")));
    }

    #[tokio::test]
    async fn fails_when_session_not_found() {
        let repo = Arc::new(MockSessionRepository::new());
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = ResetAttendancesHandler::new(repo, publisher.clone());

        let result = handler
            .handle(
                ResetAttendancesCommand {
                    session_id: SessionId::new(),
                },
                CommandMetadata::new(),
            )
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
        assert!(publisher.published_events().is_empty());
    }
}
