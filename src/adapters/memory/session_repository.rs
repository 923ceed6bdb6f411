//! In-memory session repository.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, so updates of
//! one session are serialized while different sessions proceed in
//! parallel. `update_with` mutates a copy and swaps it in only when the
//! mutator succeeds.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{SessionMutator, SessionRepository};

/// Session store for tests and the command-line runner.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the given sessions.
    pub fn with_sessions(sessions: impl IntoIterator<Item = Session>) -> Self {
        let sessions = sessions
            .into_iter()
            .map(|session| (*session.id(), Arc::new(Mutex::new(session))))
            .collect();
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn slot(&self, id: &SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(id).cloned()
    }
}

fn not_found(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(DomainError::validation(
                "session_id",
                format!("Session {} already exists", session.id()),
            ));
        }
        sessions.insert(*session.id(), Arc::new(Mutex::new(session.clone())));
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let slot = self.slot(session.id()).await.ok_or_else(|| not_found(session.id()))?;
        *slot.lock().await = session.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        match self.slot(id).await {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Session>, DomainError> {
        let slots: Vec<Arc<Mutex<Session>>> =
            self.sessions.read().await.values().cloned().collect();
        let mut sessions = Vec::with_capacity(slots.len());
        for slot in slots {
            sessions.push(slot.lock().await.clone());
        }
        sessions.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(sessions)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn update_with(
        &self,
        id: &SessionId,
        mutator: &mut SessionMutator<'_>,
    ) -> Result<Session, SessionError> {
        let slot = self.slot(id).await.ok_or(SessionError::NotFound(*id))?;
        let mut stored = slot.lock().await;

        let mut working = stored.clone();
        if let Err(err) = mutator(&mut working) {
            debug!(session = %id, error = %err, "update discarded");
            return Err(err);
        }

        *stored = working.clone();
        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TopicId;
    use crate::domain::session::Topic;

    fn session(name: &str) -> Session {
        let mut session = Session::new(SessionId::new(), name).unwrap();
        session
            .add_topic(Topic::new(TopicId::new("t1").unwrap(), "Async").with_attendees(["ann"]))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let repo = InMemorySessionRepository::new();
        let session = session("Day one");

        repo.save(&session).await.unwrap();

        assert_eq!(repo.find_by_id(session.id()).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn save_twice_is_rejected() {
        let repo = InMemorySessionRepository::new();
        let session = session("Day one");
        repo.save(&session).await.unwrap();

        let err = repo.save(&session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn update_of_unknown_session_fails() {
        let repo = InMemorySessionRepository::new();
        let err = repo.update(&session("Ghost")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let session = session("Day one");
        let repo = InMemorySessionRepository::with_sessions([session.clone()]);

        repo.delete(session.id()).await.unwrap();

        assert!(repo.is_empty().await);
        assert!(repo.delete(session.id()).await.is_err());
    }

    #[tokio::test]
    async fn update_with_commits_successful_mutation() {
        let session = session("Day one");
        let repo = InMemorySessionRepository::with_sessions([session.clone()]);

        let committed = repo
            .update_with(session.id(), &mut |s: &mut Session| {
                s.reset_attendances();
                Ok(())
            })
            .await
            .unwrap();

        assert!(committed.topics()[0].attendees().is_empty());
        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored, committed);
    }

    #[tokio::test]
    async fn update_with_discards_failed_mutation() {
        let session = session("Day one");
        let repo = InMemorySessionRepository::with_sessions([session.clone()]);

        let err = repo
            .update_with(session.id(), &mut |s: &mut Session| {
                s.reset_attendances();
                Err(SessionError::invalid_state("boom"))
            })
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::invalid_state("boom"));
        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored, session);
    }

    #[tokio::test]
    async fn update_with_unknown_session_is_not_found() {
        let repo = InMemorySessionRepository::new();
        let id = SessionId::new();

        let err = repo
            .update_with(&id, &mut |_: &mut Session| Ok(()))
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::NotFound(id));
    }

    #[tokio::test]
    async fn concurrent_updates_are_serialized() {
        let mut session = session("Day one");
        session.reset_attendances();
        let id = *session.id();
        let repo = Arc::new(InMemorySessionRepository::with_sessions([session]));

        let mut handles = Vec::new();
        for n in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.update_with(&id, &mut |s: &mut Session| {
                    let topic = TopicId::new(format!("extra-{}", n)).unwrap();
                    s.add_topic(Topic::new(topic, "More"))
                        .map_err(SessionError::from)
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.topics().len(), 9);
    }

    #[tokio::test]
    async fn list_returns_every_session() {
        let repo = InMemorySessionRepository::with_sessions([session("A"), session("B")]);
        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.len().await, 2);
    }
}
