//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionRepository` - Session persistence with exclusive updates
//! - `EventPublisher` - Publishing of domain events

mod event_publisher;
mod session_repository;

pub use event_publisher::EventPublisher;
pub use session_repository::{SessionMutator, SessionRepository};
