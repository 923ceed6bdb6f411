//! OptimizeTopicsHandler - Command handler for scheduling a session's topics.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent, SessionId, TopicId};
use crate::domain::scheduling::{
    OptimiseTopicsConfig, OptimizationOutcome, OwnerConflict, TopicOptimizer,
};
use crate::domain::session::{Session, SessionError, TopicUpdated};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to optimize a session's schedule.
#[derive(Debug, Clone)]
pub struct OptimizeTopicsCommand {
    pub session_id: SessionId,
    pub config: OptimiseTopicsConfig,
}

/// Result of a committed optimization.
#[derive(Debug, Clone)]
pub struct OptimizeTopicsResult {
    pub session: Session,
    pub events: Vec<TopicUpdated>,
    pub unplaced: Vec<TopicId>,
    pub unresolved: Vec<OwnerConflict>,
}

/// Handler for optimizing topic schedules.
///
/// The optimizer runs inside the repository's exclusive update; events are
/// published only after the session was committed.
pub struct OptimizeTopicsHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl OptimizeTopicsHandler {
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
        cmd: OptimizeTopicsCommand,
        metadata: CommandMetadata,
    ) -> Result<OptimizeTopicsResult, SessionError> {
        let optimizer = TopicOptimizer::new(cmd.config);
        let mut outcome: Option<OptimizationOutcome> = None;

        // 1. Optimize under exclusive access; nothing is stored on failure
        let committed = self
            .repository
            .update_with(&cmd.session_id, &mut |session: &mut Session| {
                outcome = Some(optimizer.optimize(session)?);
                Ok(())
            })
            .await;
        let session = match committed {
            Ok(session) => session,
            Err(err) => {
                warn!(
                    session = %cmd.session_id,
                    code = %err.code(),
                    error = %err,
                    "optimization rejected"
                );
                return Err(err);
            }
        };
        let outcome = outcome.unwrap_or_default();

        // 2. Publish one envelope per change, in mutation order
        let correlation_id = metadata.correlation_id();
        let envelopes = outcome
            .events
            .iter()
            .map(|event| {
                let envelope = event.to_envelope().with_correlation_id(correlation_id.clone());
                match metadata.trace_id() {
                    Some(trace_id) => envelope.with_trace_id(trace_id),
                    None => envelope,
                }
            })
            .collect();
        self.event_publisher.publish_all(envelopes).await?;

        info!(
            session = %cmd.session_id,
            correlation_id = %correlation_id,
            changed = outcome.events.len(),
            unplaced = outcome.unplaced.len(),
            unresolved = outcome.unresolved.len(),
            "topics optimized"
        );

        Ok(OptimizeTopicsResult {
            session,
            events: outcome.events,
            unplaced: outcome.unplaced,
            unresolved: outcome.unresolved,
        })
    }
}
