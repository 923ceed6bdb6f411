//! Session aggregate entity.
//!
//! A session owns its rooms, slots and topics and is the unit of atomic
//! mutation: the optimizer and the reset operations rewrite topics in
//! place and the whole session is committed, or nothing is.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, RoomId, SessionId, SlotId, Timestamp, TopicId};

use super::{Room, Slot, Topic};

/// Maximum length for session name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Session aggregate - an open space event with its schedule axes.
///
/// # Invariants
///
/// - `name` is 1-200 characters, non-empty
/// - room, slot and topic identifiers are unique within the session
/// - slot order is the schedule order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    id: SessionId,

    name: String,

    #[serde(default)]
    rooms: Vec<Room>,

    #[serde(default)]
    slots: Vec<Slot>,

    #[serde(default)]
    topics: Vec<Topic>,

    #[serde(default)]
    updated_at: Timestamp,
}

impl Session {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if name is empty or too long
    pub fn new(id: SessionId, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        Self::validate_name(&name)?;

        Ok(Self {
            id,
            name,
            rooms: Vec::new(),
            slots: Vec::new(),
            topics: Vec::new(),
            updated_at: Timestamp::now(),
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        name: String,
        rooms: Vec<Room>,
        slots: Vec<Slot>,
        topics: Vec<Topic>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            rooms,
            slots,
            topics,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Slots in schedule order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id() == id)
    }

    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == id)
    }

    pub fn topic(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id() == id)
    }

    /// Position of a room in the session's room list.
    pub fn room_position(&self, id: &RoomId) -> Option<usize> {
        self.rooms.iter().position(|room| room.id() == id)
    }

    /// Position of a slot in the schedule.
    pub fn slot_position(&self, id: &SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a room.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a room with the same id exists
    pub fn add_room(&mut self, room: Room) -> Result<(), DomainError> {
        if self.room(room.id()).is_some() {
            return Err(DomainError::validation(
                "room_id",
                format!("Room '{}' already exists", room.id()),
            ));
        }
        self.rooms.push(room);
        self.touch();
        Ok(())
    }

    /// Append a slot at the end of the schedule.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a slot with the same id exists
    pub fn add_slot(&mut self, slot: Slot) -> Result<(), DomainError> {
        if self.slot(slot.id()).is_some() {
            return Err(DomainError::validation(
                "slot_id",
                format!("Slot '{}' already exists", slot.id()),
            ));
        }
        self.slots.push(slot);
        self.touch();
        Ok(())
    }

    /// Add a topic. Its room/slot references are not checked here.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a topic with the same id exists
    pub fn add_topic(&mut self, topic: Topic) -> Result<(), DomainError> {
        if self.topic(topic.id()).is_some() {
            return Err(DomainError::validation(
                "topic_id",
                format!("Topic '{}' already exists", topic.id()),
            ));
        }
        self.topics.push(topic);
        self.touch();
        Ok(())
    }

    /// Mutable access to a topic by id.
    pub fn topic_mut(&mut self, id: &TopicId) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|topic| topic.id() == id)
    }

    /// Mutable access to a topic by collection position.
    pub(crate) fn topic_at_mut(&mut self, index: usize) -> Option<&mut Topic> {
        self.topics.get_mut(index)
    }

    /// Clears attendees on every topic, returning the topics that changed.
    pub fn reset_attendances(&mut self) -> Vec<TopicId> {
        let changed: Vec<TopicId> = self
            .topics
            .iter_mut()
            .filter_map(|topic| (topic.clear_attendees() > 0).then(|| topic.id().clone()))
            .collect();
        self.touch();
        changed
    }

    /// Clears ratings on every topic, returning the topics that changed.
    pub fn reset_ratings(&mut self) -> Vec<TopicId> {
        let changed: Vec<TopicId> = self
            .topics
            .iter_mut()
            .filter_map(|topic| (topic.clear_ratings() > 0).then(|| topic.id().clone()))
            .collect();
        self.touch();
        changed
    }

    /// Marks the session as modified.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("name", "Session name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(
                "name",
                format!("Session name cannot exceed {} characters", MAX_NAME_LENGTH),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, Rating};

    fn session() -> Session {
        Session::new(SessionId::new(), "RustConf Open Space").unwrap()
    }

    fn room(id: &str, seats: u32) -> Room {
        Room::new(RoomId::new(id).unwrap(), id).with_seats(seats)
    }

    fn slot(id: &str) -> Slot {
        Slot::new(SlotId::new(id).unwrap(), id)
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = Session::new(SessionId::new(), "  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn new_rejects_long_name() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(Session::new(SessionId::new(), name).is_err());
    }

    #[test]
    fn duplicate_room_is_rejected() {
        let mut session = session();
        session.add_room(room("r1", 10)).unwrap();
        let err = session.add_room(room("r1", 5)).unwrap_err();
        assert_eq!(err.details.get("field").map(String::as_str), Some("room_id"));
        assert_eq!(session.rooms().len(), 1);
    }

    #[test]
    fn slot_positions_follow_insertion_order() {
        let mut session = session();
        session.add_slot(slot("morning")).unwrap();
        session.add_slot(slot("noon")).unwrap();

        assert_eq!(session.slot_position(&SlotId::new("noon").unwrap()), Some(1));
        assert_eq!(session.slot_position(&SlotId::new("night").unwrap()), None);
    }

    #[test]
    fn duplicate_topic_is_rejected() {
        let mut session = session();
        let id = TopicId::new("t1").unwrap();
        session.add_topic(Topic::new(id.clone(), "A")).unwrap();
        assert!(session.add_topic(Topic::new(id, "B")).is_err());
    }

    #[test]
    fn reset_attendances_reports_only_changed_topics() {
        let mut session = session();
        session
            .add_topic(Topic::new(TopicId::new("t1").unwrap(), "A").with_attendees(["ann"]))
            .unwrap();
        session
            .add_topic(Topic::new(TopicId::new("t2").unwrap(), "B"))
            .unwrap();

        let changed = session.reset_attendances();
        assert_eq!(changed, vec![TopicId::new("t1").unwrap()]);
        assert!(session.topics().iter().all(|t| t.attendees().is_empty()));
    }

    #[test]
    fn reset_ratings_clears_every_topic() {
        let mut session = session();
        for id in ["t1", "t2"] {
            session
                .add_topic(
                    Topic::new(TopicId::new(id).unwrap(), id).with_rating(Rating::new(4).unwrap()),
                )
                .unwrap();
        }

        assert_eq!(session.reset_ratings().len(), 2);
        assert!(session.topics().iter().all(|t| t.ratings().is_empty()));
    }

    #[test]
    fn session_deserializes_from_minimal_document() {
        let session: Session = serde_json::from_str(
            r#"{
                "name": "Open Space",
                "rooms": [{"id": "r1", "name": "Hall", "seats": 10}],
                "slots": [{"id": "s1", "name": "Morning"}],
                "topics": [{"id": "t1", "name": "Async", "room_id": "r1", "slot_id": "s1"}]
            }"#,
        )
        .unwrap();

        assert_eq!(session.rooms()[0].capacity(), 10);
        assert!(session.topics()[0].is_assigned());
    }
}
