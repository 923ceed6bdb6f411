//! Greedy first-fit placement.

use tracing::{debug, warn};

use super::grid::{Cell, GridError};
use super::timetable::Timetable;

/// What one greedy pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Topics that stayed in a cell they already held.
    pub kept: usize,
    /// Topics placed into a new cell.
    pub placed: usize,
    /// Placements that took the cell of a lower-ranked topic.
    pub reclaimed: usize,
    /// Topics no cell could seat, now cleared.
    pub unplaced: Vec<usize>,
}

/// Places ranked topics into free cells.
///
/// A topic that already holds a cell its room can seat stays there. Any
/// other topic gives up what it holds and takes the first free cell that
/// seats it, scanning slots in order and rooms from the largest down. The
/// scan restarts for every topic.
///
/// Without a free cell, the topic takes a seating cell held by a topic
/// ranked after it; that topic is cleared and placed again on its own
/// turn. A topic nothing can seat is cleared.
///
/// Safe to call again on the same timetable with another topic list.
pub fn assign_greedy(
    timetable: &mut Timetable,
    ranked: &[usize],
) -> Result<AssignmentReport, GridError> {
    let mut report = AssignmentReport::default();

    for (rank, &topic) in ranked.iter().enumerate() {
        if timetable.holds_fitting_cell(topic) {
            report.kept += 1;
            continue;
        }

        let demand = timetable.demand(topic);
        let target = match timetable.find_free_cell(demand) {
            Some(cell) => Some(cell),
            None => {
                let reclaimed = reclaim_cell(timetable, demand, &ranked[rank + 1..])?;
                if reclaimed.is_some() {
                    report.reclaimed += 1;
                }
                reclaimed
            }
        };
        timetable.set_assignment(topic, target)?;

        let id = timetable.topic_id(topic).map_or("", |id| id.as_str());
        match target {
            Some(cell) => {
                report.placed += 1;
                debug!(topic = id, demand, %cell, "placed topic");
            }
            None => {
                report.unplaced.push(topic);
                warn!(topic = id, demand, "no free room seats topic, left unassigned");
            }
        }
    }

    Ok(report)
}

/// Frees the first seating cell, in scan order, held by a `pending` topic.
fn reclaim_cell(
    timetable: &mut Timetable,
    demand: u32,
    pending: &[usize],
) -> Result<Option<Cell>, GridError> {
    let candidate = (0..timetable.slot_count())
        .flat_map(|slot| {
            timetable
                .room_order()
                .iter()
                .map(move |&room| Cell::new(slot, room))
        })
        .filter(|cell| demand <= timetable.capacity(cell.room))
        .find_map(|cell| {
            timetable
                .occupant(cell)
                .filter(|holder| pending.contains(holder))
                .map(|holder| (cell, holder))
        });

    let Some((cell, holder)) = candidate else {
        return Ok(None);
    };
    timetable.set_assignment(holder, None)?;
    debug!(
        topic = timetable.topic_id(holder).map_or("", |id| id.as_str()),
        demand = timetable.demand(holder),
        %cell,
        "released cell for a higher-demand topic"
    );
    Ok(Some(cell))
}
