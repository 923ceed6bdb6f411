//! Real-time fan-out adapters.
//!
//! - `SessionChannels` - tokio broadcast channels grouped by session

mod session_channels;

pub use session_channels::{SessionChannels, SubscriberId};
