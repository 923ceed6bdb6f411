//! Topic optimizer - sequences partitioning, placement and conflict repair.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::foundation::{SlotId, TopicId};
use crate::domain::session::{Session, SessionError, TopicUpdated};

use super::assigner::assign_greedy;
use super::partition::{partition_topics, Partition};
use super::ranking::rank_by_demand;
use super::rectifier::rectify_conflicts;
use super::timetable::{ConflictGroup, Timetable};

fn default_rectify_conflicts() -> bool {
    true
}

/// Options for one optimization run.
///
/// Accepts both snake_case and the camelCase names used by web clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimiseTopicsConfig {
    /// Also place topics that have no room or slot yet.
    #[serde(
        default,
        alias = "optimiseUnAssignedTopics",
        alias = "optimiseUnassignedTopics"
    )]
    pub optimise_unassigned_topics: bool,

    /// Run the owner double-booking repair.
    #[serde(default = "default_rectify_conflicts", alias = "rectifyConflicts")]
    pub rectify_conflicts: bool,
}

impl Default for OptimiseTopicsConfig {
    fn default() -> Self {
        Self {
            optimise_unassigned_topics: false,
            rectify_conflicts: default_rectify_conflicts(),
        }
    }
}

/// An owner still presenting more than one topic in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerConflict {
    pub owner: String,
    pub slot: SlotId,
    pub topics: Vec<TopicId>,
}

/// Result of a successful run.
#[derive(Debug, Clone, Default)]
pub struct OptimizationOutcome {
    /// One event per topic change, in the order the changes happened.
    pub events: Vec<TopicUpdated>,
    /// Topics the placement passes could not seat anywhere.
    pub unplaced: Vec<TopicId>,
    /// Double-bookings the repair pass left in place.
    pub unresolved: Vec<OwnerConflict>,
}

impl OptimizationOutcome {
    pub fn changed_topics(&self) -> usize {
        self.events.len()
    }
}

/// Assigns topics to (slot, room) cells.
///
/// Best effort: no global optimum is sought. A run either completes and
/// rewrites the session's topics, or fails and leaves the session as it
/// was.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicOptimizer {
    config: OptimiseTopicsConfig,
}

impl TopicOptimizer {
    pub fn new(config: OptimiseTopicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimiseTopicsConfig {
        &self.config
    }

    /// Optimizes the session's schedule in place.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if a topic references a room or slot the session lacks
    /// - `ValidationFailed` if two topics share an identifier
    /// - `InvalidState` if the working grid is found inconsistent
    pub fn optimize(&self, session: &mut Session) -> Result<OptimizationOutcome, SessionError> {
        let Partition {
            mut timetable,
            assigned,
            unassigned,
        } = partition_topics(session)?;
        debug!(
            session = %session.id(),
            assigned = assigned.len(),
            unassigned = unassigned.len(),
            rooms = session.rooms().len(),
            slots = session.slots().len(),
            "partitioned topics"
        );

        let ranked = rank_by_demand(&timetable, &assigned);
        let mut report = assign_greedy(&mut timetable, &ranked)?;

        if self.config.optimise_unassigned_topics {
            let ranked = rank_by_demand(&timetable, &unassigned);
            let second = assign_greedy(&mut timetable, &ranked)?;
            report.kept += second.kept;
            report.placed += second.placed;
            report.reclaimed += second.reclaimed;
            report.unplaced.extend(second.unplaced);
        }

        let (moved, unresolved) = if self.config.rectify_conflicts {
            let rectified = rectify_conflicts(&mut timetable)?;
            (rectified.moved + rectified.swapped, rectified.unresolved)
        } else {
            (0, Vec::new())
        };

        let unplaced = report
            .unplaced
            .iter()
            .filter_map(|&topic| timetable.topic_id(topic).cloned())
            .collect();
        let unresolved = unresolved
            .iter()
            .filter_map(|group| owner_conflict(&timetable, group))
            .collect();

        let events = timetable.apply(session);
        info!(
            session = %session.id(),
            kept = report.kept,
            placed = report.placed,
            reclaimed = report.reclaimed,
            unplaced = report.unplaced.len(),
            conflicts_repaired = moved,
            changed = events.len(),
            "optimized topics"
        );

        Ok(OptimizationOutcome {
            events,
            unplaced,
            unresolved,
        })
    }
}

fn owner_conflict(timetable: &Timetable, group: &ConflictGroup) -> Option<OwnerConflict> {
    Some(OwnerConflict {
        owner: group.owner.clone(),
        slot: timetable.slot_id(group.slot)?.clone(),
        topics: group
            .members
            .iter()
            .filter_map(|&topic| timetable.topic_id(topic).cloned())
            .collect(),
    })
}
