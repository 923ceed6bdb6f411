//! Broadcast configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for per-session event channels
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct BroadcastConfig {
    /// Events buffered per session before slow subscribers lag
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    128
}

impl BroadcastConfig {
    /// Validate broadcast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let config = BroadcastConfig {
            channel_capacity: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidChannelCapacity));
        assert!(BroadcastConfig::default().validate().is_ok());
    }
}
