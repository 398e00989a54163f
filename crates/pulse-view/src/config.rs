//! View configuration.

use crate::error::{ViewError, ViewResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// View binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// How long a row flash stays visible.
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
    /// Number of cards in the top movers summary.
    #[serde(default = "default_top_movers")]
    pub top_movers: usize,
    /// Alerts start muted.
    #[serde(default = "default_start_muted")]
    pub start_muted: bool,
    /// Ring the terminal bell when an alert fires.
    #[serde(default = "default_bell")]
    pub bell: bool,
}

fn default_flash_duration_ms() -> u64 {
    400
}

fn default_top_movers() -> usize {
    4
}

fn default_start_muted() -> bool {
    true
}

fn default_bell() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: default_flash_duration_ms(),
            top_movers: default_top_movers(),
            start_muted: default_start_muted(),
            bell: default_bell(),
        }
    }
}

impl ViewConfig {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.flash_duration_ms == 0 {
            return Err(ViewError::InvalidConfig(
                "flash_duration_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.flash_duration(), Duration::from_millis(400));
        assert_eq!(config.top_movers, 4);
        assert!(config.start_muted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_flash_duration_rejected() {
        let config = ViewConfig {
            flash_duration_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ViewError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: ViewConfig = serde_json::from_str(r#"{"start_muted":false}"#).unwrap();
        assert!(!config.start_muted);
        assert_eq!(config.flash_duration_ms, 400);
    }
}
