//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `session` - Session aggregate: rooms, slots, topics and their events
//! - `scheduling` - Topic placement and owner conflict repair

pub mod foundation;
pub mod scheduling;
pub mod session;
