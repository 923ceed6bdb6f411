//! UTC timestamps for sessions and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in time in UTC, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_calls_never_go_backwards() {
        let first = Timestamp::now();
        let second = Timestamp::now();
        assert!(first <= second);
    }

    #[test]
    fn round_trips_through_rfc3339() {
        let ts: Timestamp = serde_json::from_str(r#""2024-01-15T10:30:00Z""#).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with(r#""2024-01-15T10:30:00"#));

        let later: Timestamp = serde_json::from_str(r#""2024-01-15T11:30:00Z""#).unwrap();
        assert!(ts < later);
    }
}
