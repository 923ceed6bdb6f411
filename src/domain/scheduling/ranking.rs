//! Demand ranking.

use std::cmp::Reverse;

use super::timetable::Timetable;

/// Orders topics by descending attendee count.
///
/// Ties keep collection order, so identical input always ranks the same.
pub fn rank_by_demand(timetable: &Timetable, topics: &[usize]) -> Vec<usize> {
    let mut ranked = topics.to_vec();
    ranked.sort_by_key(|&topic| (Reverse(timetable.demand(topic)), topic));
    ranked
}
