//! Working state of one optimization run.
//!
//! The timetable mirrors the session's topics by collection position and
//! keeps three views in step: each topic's cell, the occupancy grid and the
//! owner index `(owner, slot) -> topics`. Every change goes through
//! [`Timetable::set_assignment`] or [`Timetable::try_swap`], which also
//! append to the mutation log. The session itself is untouched until
//! [`Timetable::apply`] replays the log.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use crate::domain::foundation::{RoomId, SlotId, TopicId};
use crate::domain::session::{Session, SessionError, TopicUpdated};

use super::grid::{Cell, GridError, ScheduleGrid};

#[derive(Debug, Clone)]
struct TopicEntry {
    id: TopicId,
    owner: Option<String>,
    demand: u32,
    cell: Option<Cell>,
    /// Exactly one of room/slot is set on the session topic.
    stray_reference: bool,
}

/// A recorded change of one topic's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub topic: usize,
    pub cell: Option<Cell>,
}

/// Topics of one owner sharing a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGroup {
    pub owner: String,
    pub slot: usize,
    /// Topic positions in owner-index insertion order.
    pub members: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Timetable {
    entries: Vec<TopicEntry>,
    room_ids: Vec<RoomId>,
    capacities: Vec<u32>,
    room_order: Vec<usize>,
    slot_ids: Vec<SlotId>,
    positions: HashMap<TopicId, usize>,
    grid: ScheduleGrid,
    owners: HashMap<(String, usize), Vec<usize>>,
    mutations: Vec<Mutation>,
}

impl Timetable {
    /// Builds an empty timetable over the session's rooms, slots and topics.
    ///
    /// No topic holds a cell yet; see [`Timetable::claim`].
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if two topics share an identifier
    pub fn new(session: &Session) -> Result<Self, SessionError> {
        let mut positions = HashMap::with_capacity(session.topics().len());
        let mut entries = Vec::with_capacity(session.topics().len());
        for (index, topic) in session.topics().iter().enumerate() {
            if positions.insert(topic.id().clone(), index).is_some() {
                return Err(SessionError::validation(
                    "topic_id",
                    format!("Topic '{}' appears more than once", topic.id()),
                ));
            }
            entries.push(TopicEntry {
                id: topic.id().clone(),
                owner: topic.presenter().map(str::to_string),
                demand: topic.attendee_count(),
                cell: None,
                stray_reference: topic.room_id().is_some() != topic.slot_id().is_some(),
            });
        }

        let capacities: Vec<u32> = session.rooms().iter().map(|room| room.capacity()).collect();
        let mut room_order: Vec<usize> = (0..capacities.len()).collect();
        room_order.sort_by_key(|&room| Reverse(capacities[room]));

        Ok(Self {
            entries,
            room_ids: session.rooms().iter().map(|room| room.id().clone()).collect(),
            capacities,
            room_order,
            slot_ids: session.slots().iter().map(|slot| slot.id().clone()).collect(),
            positions,
            grid: ScheduleGrid::new(session.slots().len(), session.rooms().len()),
            owners: HashMap::new(),
            mutations: Vec::new(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn topic_count(&self) -> usize {
        self.entries.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_ids.len()
    }

    pub fn topic_id(&self, topic: usize) -> Option<&TopicId> {
        self.entries.get(topic).map(|entry| &entry.id)
    }

    pub fn owner(&self, topic: usize) -> Option<&str> {
        self.entries.get(topic).and_then(|entry| entry.owner.as_deref())
    }

    /// Attendee count of a topic (zero for unknown positions).
    pub fn demand(&self, topic: usize) -> u32 {
        self.entries.get(topic).map_or(0, |entry| entry.demand)
    }

    pub fn cell_of(&self, topic: usize) -> Option<Cell> {
        self.entries.get(topic).and_then(|entry| entry.cell)
    }

    pub fn capacity(&self, room: usize) -> u32 {
        self.capacities.get(room).copied().unwrap_or(0)
    }

    /// Room positions, largest capacity first, ties in session order.
    pub fn room_order(&self) -> &[usize] {
        &self.room_order
    }

    pub fn grid(&self) -> &ScheduleGrid {
        &self.grid
    }

    /// Topic position holding a cell, if any.
    pub fn occupant(&self, cell: Cell) -> Option<usize> {
        let id = self.grid.occupant_of(cell)?;
        self.positions.get(id).copied()
    }

    /// Returns true if the topic's recorded cell is held by it in the grid.
    pub fn holds_cell(&self, topic: usize) -> bool {
        match self.entries.get(topic) {
            Some(TopicEntry {
                id,
                cell: Some(cell),
                ..
            }) => self.grid.occupant_of(*cell) == Some(id),
            _ => false,
        }
    }

    /// Returns true if the topic holds its cell and the room seats everyone.
    pub fn holds_fitting_cell(&self, topic: usize) -> bool {
        self.holds_cell(topic)
            && self
                .cell_of(topic)
                .is_some_and(|cell| self.demand(topic) <= self.capacity(cell.room))
    }

    /// First free cell that seats `demand`, slot-major, largest room first.
    pub fn find_free_cell(&self, demand: u32) -> Option<Cell> {
        (0..self.slot_count())
            .flat_map(|slot| self.room_order.iter().map(move |&room| Cell::new(slot, room)))
            .find(|&cell| self.grid.is_free(cell) && demand <= self.capacity(cell.room))
    }

    /// Slots in which the owner currently has a topic.
    pub fn owner_slots(&self, owner: &str) -> BTreeSet<usize> {
        self.owners
            .iter()
            .filter(|((name, _), members)| name == owner && !members.is_empty())
            .map(|((_, slot), _)| *slot)
            .collect()
    }

    /// Returns true if the owner has any topic in the slot.
    pub fn owner_has_topic_in(&self, owner: &str, slot: usize) -> bool {
        self.owners
            .get(&(owner.to_string(), slot))
            .is_some_and(|members| !members.is_empty())
    }

    /// Returns true if the topic shares its slot with another of its owner's topics.
    pub fn is_conflicting(&self, topic: usize) -> bool {
        match (self.owner(topic), self.cell_of(topic)) {
            (Some(owner), Some(cell)) => self
                .owners
                .get(&(owner.to_string(), cell.slot))
                .is_some_and(|members| members.len() > 1),
            _ => false,
        }
    }

    /// Current owner double-bookings, by slot then first member.
    pub fn conflicts(&self) -> Vec<ConflictGroup> {
        let mut groups: Vec<ConflictGroup> = self
            .owners
            .iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|((owner, slot), members)| ConflictGroup {
                owner: owner.clone(),
                slot: *slot,
                members: members.clone(),
            })
            .collect();
        groups.sort_by_key(|group| (group.slot, group.members.first().copied()));
        groups
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn room_id(&self, room: usize) -> Option<&RoomId> {
        self.room_ids.get(room)
    }

    pub fn slot_id(&self, slot: usize) -> Option<&SlotId> {
        self.slot_ids.get(slot)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records the topic's existing cell from the session.
    ///
    /// Returns false when another topic claimed the cell first; the topic
    /// keeps the cell as its recorded position but does not hold it.
    pub fn claim(&mut self, topic: usize, cell: Cell) -> Result<bool, GridError> {
        if !self.grid.contains(cell) {
            return Err(GridError::OutOfBounds {
                cell,
                slots: self.grid.slot_count(),
                rooms: self.grid.room_count(),
            });
        }
        let Some(entry) = self.entries.get_mut(topic) else {
            return Ok(false);
        };
        entry.cell = Some(cell);
        entry.stray_reference = false;
        let id = entry.id.clone();
        self.index_owner(topic, cell.slot);

        if self.grid.is_free(cell) {
            self.grid.occupy(cell, id)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Moves a topic to `cell`, or clears it with `None`.
    ///
    /// Releases the topic's current cell if it holds one, occupies the new
    /// one, and keeps the owner index in step. Returns true and logs a
    /// mutation if the topic's room/slot actually change.
    pub fn set_assignment(&mut self, topic: usize, cell: Option<Cell>) -> Result<bool, GridError> {
        let Some(entry) = self.entries.get(topic) else {
            return Ok(false);
        };
        let current = entry.cell;
        let changed = current != cell || entry.stray_reference;
        let id = entry.id.clone();

        if current == cell && self.holds_cell(topic) {
            return Ok(changed);
        }
        // Validate the target before touching anything.
        if let Some(target) = cell.filter(|&target| !self.grid.is_free(target)) {
            return Err(match self.grid.occupant_of(target) {
                Some(occupant) => GridError::Occupied {
                    cell: target,
                    occupant: occupant.clone(),
                },
                None => GridError::OutOfBounds {
                    cell: target,
                    slots: self.grid.slot_count(),
                    rooms: self.grid.room_count(),
                },
            });
        }

        if self.holds_cell(topic) {
            if let Some(old) = current {
                self.grid.release(old)?;
            }
        }
        if let Some(target) = cell {
            self.grid.occupy(target, id)?;
        }
        if let Some(old) = current {
            self.unindex_owner(topic, old.slot);
        }
        if let Some(target) = cell {
            self.index_owner(topic, target.slot);
        }
        if let Some(entry) = self.entries.get_mut(topic) {
            entry.cell = cell;
            entry.stray_reference = false;
        }
        if changed {
            self.mutations.push(Mutation { topic, cell });
        }
        Ok(changed)
    }

    /// Exchanges the cells of two topics.
    ///
    /// Both topics must hold their cells. Returns `Ok(false)` without
    /// changing anything if either topic would not fit the other's room.
    pub fn try_swap(&mut self, a: usize, b: usize) -> Result<bool, GridError> {
        let (Some(cell_a), Some(cell_b)) = (self.cell_of(a), self.cell_of(b)) else {
            return Ok(false);
        };
        if !self.holds_cell(a) {
            return Err(GridError::Vacant { cell: cell_a });
        }
        if !self.holds_cell(b) {
            return Err(GridError::Vacant { cell: cell_b });
        }
        if a == b || cell_a == cell_b {
            return Ok(false);
        }
        if self.demand(a) > self.capacity(cell_b.room) || self.demand(b) > self.capacity(cell_a.room)
        {
            return Ok(false);
        }

        self.grid.swap(cell_a, cell_b)?;
        self.unindex_owner(a, cell_a.slot);
        self.unindex_owner(b, cell_b.slot);
        self.index_owner(a, cell_b.slot);
        self.index_owner(b, cell_a.slot);
        if let Some(entry) = self.entries.get_mut(a) {
            entry.cell = Some(cell_b);
        }
        if let Some(entry) = self.entries.get_mut(b) {
            entry.cell = Some(cell_a);
        }
        self.mutations.push(Mutation {
            topic: a,
            cell: Some(cell_b),
        });
        self.mutations.push(Mutation {
            topic: b,
            cell: Some(cell_a),
        });
        Ok(true)
    }

    /// Writes the logged changes onto the session.
    ///
    /// A topic changed several times during the run is written once with
    /// its final cell. Returns one event per topic whose room/slot differ
    /// afterwards, ordered by the topic's first logged change.
    pub fn apply(&self, session: &mut Session) -> Vec<TopicUpdated> {
        let session_id = *session.id();
        let mut order = Vec::new();
        let mut last: HashMap<usize, Option<Cell>> = HashMap::new();
        for mutation in &self.mutations {
            if last.insert(mutation.topic, mutation.cell).is_none() {
                order.push(mutation.topic);
            }
        }

        let mut events = Vec::with_capacity(order.len());
        for topic in order {
            let cell = last.get(&topic).copied().flatten();
            let (room_id, slot_id) = match cell {
                Some(cell) => (
                    self.room_id(cell.room).cloned(),
                    self.slot_id(cell.slot).cloned(),
                ),
                None => (None, None),
            };
            let Some(topic) = session.topic_at_mut(topic) else {
                continue;
            };
            if topic.set_assignment(room_id, slot_id) {
                events.push(TopicUpdated::new(session_id, topic.clone()));
            }
        }

        if !events.is_empty() {
            session.touch();
        }
        events
    }

    fn index_owner(&mut self, topic: usize, slot: usize) {
        if let Some(owner) = self.owner(topic).map(str::to_string) {
            self.owners.entry((owner, slot)).or_default().push(topic);
        }
    }

    fn unindex_owner(&mut self, topic: usize, slot: usize) {
        let Some(owner) = self.owner(topic).map(str::to_string) else {
            return;
        };
        let key = (owner, slot);
        if let Some(members) = self.owners.get_mut(&key) {
            members.retain(|&member| member != topic);
            if members.is_empty() {
                self.owners.remove(&key);
            }
        }
    }
}
