//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory session storage
//! - `events` - Event capture for tests and the command-line runner
//! - `broadcast` - Per-session fan-out of topic updates

pub mod broadcast;
pub mod events;
pub mod memory;

pub use broadcast::{SessionChannels, SubscriberId};
pub use events::InMemoryEventBus;
pub use memory::InMemorySessionRepository;
