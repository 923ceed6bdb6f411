//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and event infrastructure
//! that form the vocabulary of the open space domain.

mod command;
mod errors;
mod events;
mod ids;
mod rating;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{RoomId, SessionId, SlotId, TopicId};
pub use rating::Rating;
pub use timestamp::Timestamp;
