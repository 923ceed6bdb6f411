//! Hand-written port doubles for the session handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{EventPublisher, SessionMutator, SessionRepository};

pub(crate) struct MockSessionRepository {
    sessions: Mutex<Vec<Session>>,
    fail_update: bool,
}

impl MockSessionRepository {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            fail_update: false,
        }
    }

    pub(crate) fn with_session(session: Session) -> Self {
        Self {
            sessions: Mutex::new(vec![session]),
            fail_update: false,
        }
    }

    pub(crate) fn failing_updates(session: Session) -> Self {
        Self {
            sessions: Mutex::new(vec![session]),
            fail_update: true,
        }
    }

    pub(crate) fn get_session(&self, id: &SessionId) -> Option<Session> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        if self.fail_update {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated update failure",
            ));
        }
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(pos) = sessions.iter().position(|s| s.id() == session.id()) {
            sessions[pos] = session.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.get_session(id))
    }

    async fn list(&self) -> Result<Vec<Session>, DomainError> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn delete(&self, _id: &SessionId) -> Result<(), DomainError> {
        Ok(())
    }

    async fn update_with(
        &self,
        id: &SessionId,
        mutator: &mut SessionMutator<'_>,
    ) -> Result<Session, SessionError> {
        let mut working = self.get_session(id).ok_or(SessionError::NotFound(*id))?;
        mutator(&mut working)?;
        self.update(&working).await?;
        Ok(working)
    }
}

pub(crate) struct MockEventPublisher {
    published_events: Mutex<Vec<EventEnvelope>>,
    fail: bool,
}

impl MockEventPublisher {
    pub(crate) fn new() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn published_events(&self) -> Vec<EventEnvelope> {
        self.published_events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(ErrorCode::PublishFailed, "Simulated publish failure"));
        }
        self.published_events.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
