//! Topic entity - a proposed discussion item competing for a room and slot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Rating, RoomId, SlotId, TopicId};

/// Someone who intends to attend a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub name: String,
}

impl Attendance {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Free-text feedback left on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
}

fn default_slot_span() -> u32 {
    1
}

/// A proposed topic.
///
/// # Invariants
///
/// - `room_id`/`slot_id`, if set, reference a room/slot of the owning session
///   (checked by the scheduler, not on construction)
/// - With both set, the attendee count fits the room's capacity after every
///   optimizer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    id: TopicId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    room_id: Option<RoomId>,
    #[serde(default)]
    slot_id: Option<SlotId>,
    #[serde(default)]
    attendees: Vec<Attendance>,
    #[serde(default)]
    demands: Vec<String>,
    #[serde(default)]
    feedback: Vec<Feedback>,
    #[serde(default)]
    ratings: Vec<Rating>,
    /// Duration in slot units. Placement always occupies a single cell.
    #[serde(default = "default_slot_span")]
    slots: u32,
}

impl Topic {
    /// Creates an unassigned topic without owner or attendees.
    pub fn new(id: TopicId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            owner: None,
            room_id: None,
            slot_id: None,
            attendees: Vec::new(),
            demands: Vec::new(),
            feedback: Vec::new(),
            ratings: Vec::new(),
            slots: default_slot_span(),
        }
    }

    /// Builder: set the presenting owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set room and slot references.
    pub fn placed_in(mut self, room_id: RoomId, slot_id: SlotId) -> Self {
        self.room_id = Some(room_id);
        self.slot_id = Some(slot_id);
        self
    }

    /// Builder: set only the room reference.
    pub fn with_room(mut self, room_id: RoomId) -> Self {
        self.room_id = Some(room_id);
        self
    }

    /// Builder: set only the slot reference.
    pub fn with_slot(mut self, slot_id: SlotId) -> Self {
        self.slot_id = Some(slot_id);
        self
    }

    /// Builder: add attendees.
    pub fn with_attendees<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees.extend(names.into_iter().map(Attendance::new));
        self
    }

    /// Builder: add one rating.
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.ratings.push(rating);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TopicId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owner as given, including blank values.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns the trimmed owner, or `None` when absent or blank.
    ///
    /// Only presenting owners can be double-booked.
    pub fn presenter(&self) -> Option<&str> {
        self.owner
            .as_deref()
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    pub fn slot_id(&self) -> Option<&SlotId> {
        self.slot_id.as_ref()
    }

    pub fn attendees(&self) -> &[Attendance] {
        &self.attendees
    }

    /// Attendee count, the topic's demand for seats.
    pub fn attendee_count(&self) -> u32 {
        u32::try_from(self.attendees.len()).unwrap_or(u32::MAX)
    }

    pub fn demands(&self) -> &[String] {
        &self.demands
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn slots(&self) -> u32 {
        self.slots
    }

    /// Returns true if both room and slot are set.
    pub fn is_assigned(&self) -> bool {
        self.room_id.is_some() && self.slot_id.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces the room/slot references, returning true if anything changed.
    pub fn set_assignment(&mut self, room_id: Option<RoomId>, slot_id: Option<SlotId>) -> bool {
        if self.room_id == room_id && self.slot_id == slot_id {
            return false;
        }
        self.room_id = room_id;
        self.slot_id = slot_id;
        true
    }

    /// Removes every attendee, returning how many were removed.
    pub fn clear_attendees(&mut self) -> usize {
        let removed = self.attendees.len();
        self.attendees.clear();
        removed
    }

    /// Removes every rating, returning how many were removed.
    pub fn clear_ratings(&mut self) -> usize {
        let removed = self.ratings.len();
        self.ratings.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> Topic {
        Topic::new(TopicId::new("t1").unwrap(), "Rust in production")
    }

    #[test]
    fn new_topic_is_unassigned_with_single_slot_span() {
        let topic = topic();
        assert!(!topic.is_assigned());
        assert_eq!(topic.slots(), 1);
        assert_eq!(topic.attendee_count(), 0);
    }

    #[test]
    fn attendee_count_is_demand() {
        let topic = topic().with_attendees(["ann", "bob", "cy"]);
        assert_eq!(topic.attendee_count(), 3);
    }

    #[test]
    fn blank_owner_is_not_a_presenter() {
        assert_eq!(topic().with_owner("   ").presenter(), None);
        assert_eq!(topic().presenter(), None);
        assert_eq!(topic().with_owner(" ann ").presenter(), Some("ann"));
    }

    #[test]
    fn partial_reference_is_not_assigned() {
        let topic = topic().with_room(RoomId::new("r1").unwrap());
        assert!(!topic.is_assigned());
    }

    #[test]
    fn set_assignment_reports_changes() {
        let mut topic = topic();
        let room = RoomId::new("r1").unwrap();
        let slot = SlotId::new("s1").unwrap();

        assert!(topic.set_assignment(Some(room.clone()), Some(slot.clone())));
        assert!(!topic.set_assignment(Some(room), Some(slot)));
        assert!(topic.set_assignment(None, None));
        assert!(!topic.is_assigned());
    }

    #[test]
    fn clearing_collections_returns_removed_counts() {
        let mut topic = topic()
            .with_attendees(["ann", "bob"])
            .with_rating(Rating::new(5).unwrap());

        assert_eq!(topic.clear_attendees(), 2);
        assert_eq!(topic.clear_ratings(), 1);
        assert!(topic.attendees().is_empty());
        assert!(topic.ratings().is_empty());
    }

    #[test]
    fn topic_deserializes_with_defaults() {
        let topic: Topic = serde_json::from_str(r#"{"id":"t9","name":"Async"}"#).unwrap();
        assert_eq!(topic.slots(), 1);
        assert!(topic.owner().is_none());
        assert!(topic.demands().is_empty());
    }
}
