use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine bootstrap configuration.
///
/// Serializable so host applications can persist/load chart setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Viewport size in samples; must not exceed the dataset length.
    pub capacity: usize,
    /// Tick cadence requested from the host scheduler.
    #[serde(default = "default_period")]
    pub period: Duration,
    /// Line color; malformed values fall back to the palette default.
    #[serde(default)]
    pub color: Option<String>,
}

fn default_period() -> Duration {
    Duration::from_millis(2)
}

impl EngineConfig {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            period: default_period(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
