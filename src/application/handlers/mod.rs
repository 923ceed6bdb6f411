//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod session;

pub use session::{
    OptimizeTopicsCommand, OptimizeTopicsHandler, OptimizeTopicsResult,
    ResetAttendancesCommand, ResetAttendancesHandler, ResetAttendancesResult,
    ResetRatingsCommand, ResetRatingsHandler, ResetRatingsResult,
};
