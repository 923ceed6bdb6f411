//! Splits a session's topics into assigned and unassigned.

use tracing::debug;

use crate::domain::session::{EntityKind, Session, SessionError};

use super::grid::Cell;
use super::timetable::Timetable;

/// Result of partitioning: the timetable with every resolvable cell
/// pre-marked, plus topic positions in collection order.
#[derive(Debug, Clone)]
pub struct Partition {
    pub timetable: Timetable,
    pub assigned: Vec<usize>,
    pub unassigned: Vec<usize>,
}

/// Resolves each topic's room and slot against the session.
///
/// A topic missing either reference is unassigned and its other reference
/// is not looked at. A topic with both references is assigned and claims
/// its cell; when two topics name the same cell the first in collection
/// order holds it.
///
/// # Errors
///
/// - `EntityNotFound` if a referenced room or slot is not in the session
/// - `ValidationFailed` if two topics share an identifier
pub fn partition_topics(session: &Session) -> Result<Partition, SessionError> {
    let mut timetable = Timetable::new(session)?;
    let mut assigned = Vec::new();
    let mut unassigned = Vec::new();

    for (index, topic) in session.topics().iter().enumerate() {
        let (Some(room_id), Some(slot_id)) = (topic.room_id(), topic.slot_id()) else {
            unassigned.push(index);
            continue;
        };

        let room = session.room_position(room_id).ok_or_else(|| {
            SessionError::entity_not_found(EntityKind::Room, room_id.as_str(), topic.id().clone())
        })?;
        let slot = session.slot_position(slot_id).ok_or_else(|| {
            SessionError::entity_not_found(EntityKind::Slot, slot_id.as_str(), topic.id().clone())
        })?;

        let cell = Cell::new(slot, room);
        if !timetable.claim(index, cell)? {
            debug!(
                topic = %topic.id(),
                room = %room_id,
                slot = %slot_id,
                "cell already claimed by an earlier topic"
            );
        }
        assigned.push(index);
    }

    Ok(Partition {
        timetable,
        assigned,
        unassigned,
    })
}
