//! Rooms and time slots - the two axes of a session's schedule.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RoomId, SlotId};

/// A room topics can be held in.
///
/// `seats` is optional; a room without a seat count is treated as
/// having no capacity at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: String,
    #[serde(default)]
    seats: Option<u32>,
}

impl Room {
    /// Creates a room with an unset seat count.
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            seats: None,
        }
    }

    /// Builder: set the seat count.
    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seats = Some(seats);
        self
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seats(&self) -> Option<u32> {
        self.seats
    }

    /// Seat capacity used for placement (unset counts as zero).
    pub fn capacity(&self) -> u32 {
        self.seats.unwrap_or(0)
    }

    /// Returns true if `demand` attendees fit in this room.
    pub fn fits(&self, demand: u32) -> bool {
        demand <= self.capacity()
    }
}

/// A discrete time period of the session.
///
/// Slots have no explicit start time here; their order in the session's
/// slot list is the schedule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    name: String,
    #[serde(default)]
    time: Option<String>,
}

impl Slot {
    pub fn new(id: SlotId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            time: None,
        }
    }

    /// Builder: attach a display time (e.g. "10:30").
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn id(&self) -> &SlotId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(seats: Option<u32>) -> Room {
        let room = Room::new(RoomId::new("r1").unwrap(), "Main hall");
        match seats {
            Some(seats) => room.with_seats(seats),
            None => room,
        }
    }

    #[test]
    fn unset_seats_mean_zero_capacity() {
        let room = room(None);
        assert_eq!(room.capacity(), 0);
        assert!(room.fits(0));
        assert!(!room.fits(1));
    }

    #[test]
    fn fits_is_inclusive() {
        let room = room(Some(10));
        assert!(room.fits(10));
        assert!(!room.fits(11));
    }

    #[test]
    fn room_deserializes_without_seats() {
        let room: Room = serde_json::from_str(r#"{"id":"r1","name":"Hall"}"#).unwrap();
        assert_eq!(room.seats(), None);
        assert_eq!(room.capacity(), 0);
    }

    #[test]
    fn slot_keeps_display_time() {
        let slot = Slot::new(SlotId::new("s1").unwrap(), "Morning").with_time("09:00");
        assert_eq!(slot.time(), Some("09:00"));
        assert_eq!(slot.name(), "Morning");
    }
}
