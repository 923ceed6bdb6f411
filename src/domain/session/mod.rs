//! Session module - the open space aggregate and its members.
//!
//! A session holds the rooms and time slots of an open space event and
//! the topics proposed for it.

mod aggregate;
mod errors;
mod events;
mod room;
mod topic;

pub use aggregate::{Session, MAX_NAME_LENGTH};
pub use errors::{EntityKind, SessionError};
pub use events::TopicUpdated;
pub use room::{Room, Slot};
pub use topic::{Attendance, Feedback, Topic};
