//! Session builder shared by the scheduling unit tests.

use crate::domain::foundation::{RoomId, SessionId, SlotId, TopicId};
use crate::domain::session::{Room, Session, Slot, Topic};

#[derive(Default)]
pub(crate) struct SessionBuilder {
    rooms: Vec<Room>,
    slots: Vec<Slot>,
    topics: Vec<Topic>,
}

impl SessionBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn room(mut self, id: &str, seats: u32) -> Self {
        self.rooms
            .push(Room::new(RoomId::new(id).unwrap(), id).with_seats(seats));
        self
    }

    pub(crate) fn slot(mut self, id: &str) -> Self {
        self.slots.push(Slot::new(SlotId::new(id).unwrap(), id));
        self
    }

    pub(crate) fn topic(self, id: &str, demand: usize) -> Self {
        self.push(base_topic(id, demand))
    }

    pub(crate) fn owned_topic(self, id: &str, demand: usize, owner: &str) -> Self {
        self.push(base_topic(id, demand).with_owner(owner))
    }

    pub(crate) fn placed_topic(
        self,
        id: &str,
        demand: usize,
        owner: Option<&str>,
        room: &str,
        slot: &str,
    ) -> Self {
        let mut topic = base_topic(id, demand)
            .placed_in(RoomId::new(room).unwrap(), SlotId::new(slot).unwrap());
        if let Some(owner) = owner {
            topic = topic.with_owner(owner);
        }
        self.push(topic)
    }

    pub(crate) fn partial_topic(
        self,
        id: &str,
        demand: usize,
        room: Option<&str>,
        slot: Option<&str>,
    ) -> Self {
        let mut topic = base_topic(id, demand);
        if let Some(room) = room {
            topic = topic.with_room(RoomId::new(room).unwrap());
        }
        if let Some(slot) = slot {
            topic = topic.with_slot(SlotId::new(slot).unwrap());
        }
        self.push(topic)
    }

    /// Builds the session without uniqueness checks on topics.
    pub(crate) fn build(self) -> Session {
        let mut session = Session::new(SessionId::new(), "Open Space").unwrap();
        for room in self.rooms {
            session.add_room(room).unwrap();
        }
        for slot in self.slots {
            session.add_slot(slot).unwrap();
        }
        Session::reconstitute(
            *session.id(),
            session.name().to_string(),
            session.rooms().to_vec(),
            session.slots().to_vec(),
            self.topics,
            *session.updated_at(),
        )
    }

    fn push(mut self, topic: Topic) -> Self {
        self.topics.push(topic);
        self
    }
}

fn base_topic(id: &str, demand: usize) -> Topic {
    Topic::new(TopicId::new(id).unwrap(), format!("Topic {}", id))
        .with_attendees((0..demand).map(|n| format!("attendee-{}", n)))
}
