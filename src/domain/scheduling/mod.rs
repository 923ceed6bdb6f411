//! Scheduling module - places topics into (slot, room) cells.
//!
//! A run partitions the session's topics, places them greedily by demand
//! and optionally repairs owner double-bookings. All work happens on a
//! [`Timetable`]; the session only changes once the run has succeeded.

mod assigner;
mod grid;
mod optimizer;
mod partition;
mod ranking;
mod rectifier;
mod timetable;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assigner::{assign_greedy, AssignmentReport};
pub use grid::{Cell, GridError, ScheduleGrid};
pub use optimizer::{OptimiseTopicsConfig, OptimizationOutcome, OwnerConflict, TopicOptimizer};
pub use partition::{partition_topics, Partition};
pub use ranking::rank_by_demand;
pub use rectifier::{rectify_conflicts, RectifyReport};
pub use timetable::{ConflictGroup, Mutation, Timetable};
