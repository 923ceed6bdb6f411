//! Owner double-booking repair.
//!
//! One sweep over the conflicts present when the pass starts. Every topic
//! of a group except the first is moved to a free cell in a slot where its
//! owner has nothing, or swapped with a topic already there. Conflicts the
//! sweep cannot fix stay as they are.

use tracing::{debug, warn};

use super::grid::{Cell, GridError};
use super::timetable::{ConflictGroup, Timetable};

/// What one rectification pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectifyReport {
    pub moved: usize,
    pub swapped: usize,
    /// Conflicts still present after the pass.
    pub unresolved: Vec<ConflictGroup>,
}

enum Relocation {
    Moved(Cell),
    Swapped { with: usize, cell: Cell },
}

/// Repairs owner double-bookings in place.
pub fn rectify_conflicts(timetable: &mut Timetable) -> Result<RectifyReport, GridError> {
    let mut report = RectifyReport::default();
    let groups = timetable.conflicts();

    for group in &groups {
        for &topic in group.members.iter().skip(1) {
            // Earlier repairs in this sweep may already have settled it.
            let still_here = timetable
                .cell_of(topic)
                .is_some_and(|cell| cell.slot == group.slot);
            if !still_here || !timetable.is_conflicting(topic) {
                continue;
            }

            let id = timetable.topic_id(topic).map_or("", |id| id.as_str()).to_string();
            match relocate(timetable, topic, &group.owner)? {
                Some(Relocation::Moved(cell)) => {
                    report.moved += 1;
                    debug!(topic = %id, owner = %group.owner, %cell, "moved conflicting topic");
                }
                Some(Relocation::Swapped { with, cell }) => {
                    report.swapped += 1;
                    debug!(
                        topic = %id,
                        with = timetable.topic_id(with).map_or("", |id| id.as_str()),
                        owner = %group.owner,
                        %cell,
                        "swapped conflicting topic"
                    );
                }
                None => {
                    debug!(topic = %id, owner = %group.owner, "no relocation for conflicting topic");
                }
            }
        }
    }

    report.unresolved = timetable.conflicts();
    for conflict in &report.unresolved {
        warn!(
            owner = %conflict.owner,
            slot = conflict.slot,
            topics = conflict.members.len(),
            "owner conflict left unresolved"
        );
    }
    Ok(report)
}

/// Finds a new cell for `topic` outside every slot its owner uses.
fn relocate(
    timetable: &mut Timetable,
    topic: usize,
    owner: &str,
) -> Result<Option<Relocation>, GridError> {
    let Some(origin) = timetable.cell_of(topic) else {
        return Ok(None);
    };
    let demand = timetable.demand(topic);
    let busy = timetable.owner_slots(owner);
    let rooms = timetable.room_order().to_vec();

    for slot in (0..timetable.slot_count()).filter(|slot| !busy.contains(slot)) {
        for &room in &rooms {
            let target = Cell::new(slot, room);
            match timetable.occupant(target) {
                None => {
                    if demand <= timetable.capacity(room) {
                        timetable.set_assignment(topic, Some(target))?;
                        return Ok(Some(Relocation::Moved(target)));
                    }
                }
                Some(other) => {
                    // The other topic lands in the vacated slot; its owner must be free there.
                    let other_free = timetable
                        .owner(other)
                        .map_or(true, |other_owner| {
                            !timetable.owner_has_topic_in(other_owner, origin.slot)
                        });
                    if other_free && timetable.try_swap(topic, other)? {
                        return Ok(Some(Relocation::Swapped {
                            with: other,
                            cell: target,
                        }));
                    }
                }
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::fixtures::SessionBuilder;
    use crate::domain::scheduling::partition::partition_topics;

    fn rectified(builder: SessionBuilder) -> (Timetable, RectifyReport) {
        let session = builder.build();
        let mut timetable = partition_topics(&session).unwrap().timetable;
        let report = rectify_conflicts(&mut timetable).unwrap();
        (timetable, report)
    }

    #[test]
    fn later_topic_moves_to_free_cell() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .slot("s2")
                .placed_topic("t1", 3, Some("ann"), "r1", "s1")
                .placed_topic("t2", 3, Some("ann"), "r2", "s1"),
        );

        assert_eq!(report.moved, 1);
        assert!(report.unresolved.is_empty());
        assert_eq!(timetable.cell_of(0), Some(Cell::new(0, 0)));
        assert_eq!(timetable.cell_of(1), Some(Cell::new(1, 0)));
    }

    #[test]
    fn conflict_without_fitting_move_or_swap_stays() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("big", 10)
                .room("mid", 4)
                .room("tiny", 1)
                .slot("s1")
                .slot("s2")
                .placed_topic("t1", 3, Some("ann"), "big", "s1")
                .placed_topic("t2", 4, Some("ann"), "mid", "s1")
                .placed_topic("t3", 9, Some("bob"), "big", "s2")
                .placed_topic("t4", 4, Some("cy"), "mid", "s2")
                .placed_topic("t5", 1, Some("cy"), "tiny", "s1"),
        );

        // tiny is too small, t3 would not fit mid, and cy already presents in s1.
        assert_eq!(report.moved + report.swapped, 0);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].owner, "ann");
        assert_eq!(timetable.cell_of(1), Some(Cell::new(0, 1)));
    }

    #[test]
    fn swaps_when_no_free_cell_exists() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .slot("s2")
                .placed_topic("t1", 3, Some("ann"), "r1", "s1")
                .placed_topic("t2", 3, Some("ann"), "r2", "s1")
                .placed_topic("t3", 3, Some("bob"), "r1", "s2")
                .placed_topic("t4", 3, Some("cy"), "r2", "s2"),
        );

        assert_eq!(report.swapped, 1);
        assert!(report.unresolved.is_empty());
        assert_eq!(timetable.cell_of(1), Some(Cell::new(1, 0)));
        assert_eq!(timetable.cell_of(2), Some(Cell::new(0, 1)));
    }

    #[test]
    fn swap_refused_when_it_would_double_book_the_other_owner() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .slot("s2")
                .placed_topic("t1", 3, Some("ann"), "r1", "s1")
                .placed_topic("t2", 3, Some("ann"), "r2", "s1")
                .placed_topic("t3", 3, Some("bob"), "r1", "s2")
                .placed_topic("t4", 3, Some("bob"), "r2", "s2")
                .placed_topic("t5", 3, Some("bob"), "r3", "s1")
                .placed_topic("t6", 3, Some("bob"), "r3", "s2")
                .room("r3", 10),
        );

        // bob already presents in s1, so nothing from s2 may move there.
        assert_eq!(report.moved + report.swapped, 0);
        assert_eq!(timetable.cell_of(1), Some(Cell::new(0, 1)));
        assert_eq!(report.unresolved.len(), 2);
    }

    #[test]
    fn unowned_occupant_can_always_be_swapped() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .slot("s2")
                .placed_topic("t1", 3, Some("ann"), "r1", "s1")
                .placed_topic("t2", 3, Some("ann"), "r2", "s1")
                .placed_topic("t3", 3, None, "r1", "s2")
                .placed_topic("t4", 3, Some(" "), "r2", "s2"),
        );

        assert_eq!(report.swapped, 1);
        assert_eq!(timetable.cell_of(2), Some(Cell::new(0, 1)));
    }

    #[test]
    fn blank_owners_never_conflict() {
        let (_, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .placed_topic("t1", 3, Some(""), "r1", "s1")
                .placed_topic("t2", 3, Some("  "), "r2", "s1"),
        );

        assert_eq!(report, RectifyReport::default());
    }

    #[test]
    fn owner_moves_only_into_slots_they_do_not_use() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .slot("s1")
                .slot("s2")
                .slot("s3")
                .placed_topic("t1", 1, Some("ann"), "r1", "s1")
                .placed_topic("t2", 1, Some("ann"), "r2", "s1")
                .placed_topic("t3", 1, Some("ann"), "r1", "s2"),
        );

        assert_eq!(report.moved, 1);
        assert_eq!(timetable.cell_of(1), Some(Cell::new(2, 0)));
    }

    #[test]
    fn three_way_conflict_spreads_over_free_slots() {
        let (timetable, report) = rectified(
            SessionBuilder::new()
                .room("r1", 10)
                .room("r2", 10)
                .room("r3", 10)
                .slot("s1")
                .slot("s2")
                .slot("s3")
                .placed_topic("t1", 1, Some("ann"), "r1", "s1")
                .placed_topic("t2", 1, Some("ann"), "r2", "s1")
                .placed_topic("t3", 1, Some("ann"), "r3", "s1"),
        );

        assert_eq!(report.moved, 2);
        assert!(report.unresolved.is_empty());
        assert_eq!(timetable.cell_of(1), Some(Cell::new(1, 0)));
        assert_eq!(timetable.cell_of(2), Some(Cell::new(2, 0)));
    }
}
