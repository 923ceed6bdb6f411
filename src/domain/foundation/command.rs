//! Request context passed to every command handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation and trace ids of the request behind a command.
///
/// Handlers copy both onto the events they publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl CommandMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Returns the correlation id, or a fresh one when none was given.
    ///
    /// A fresh id is not remembered, so resolve it once per command.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_correlation_id_is_kept() {
        let metadata = CommandMetadata::new().with_correlation_id("corr-1");
        assert_eq!(metadata.correlation_id(), "corr-1");
    }

    #[test]
    fn missing_correlation_id_is_a_fresh_uuid() {
        let generated = CommandMetadata::new().correlation_id();
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn trace_id_is_optional() {
        assert_eq!(CommandMetadata::new().trace_id(), None);
        let metadata = CommandMetadata::new().with_trace_id("trace-1");
        assert_eq!(metadata.trace_id(), Some("trace-1"));
    }
}
