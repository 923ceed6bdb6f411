//! Session command handlers.

mod optimize_topics;
mod reset_attendances;
mod reset_ratings;

#[cfg(test)]
pub(crate) mod mocks;

pub use optimize_topics::{OptimizeTopicsCommand, OptimizeTopicsHandler, OptimizeTopicsResult};
pub use reset_attendances::{
    ResetAttendancesCommand, ResetAttendancesHandler, ResetAttendancesResult,
};
pub use reset_ratings::{ResetRatingsCommand, ResetRatingsHandler, ResetRatingsResult};
