use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default tab stop width.
const DEFAULT_TAB_STOP: usize = 4;
/// Default multi-click window.
const DOUBLE_CLICK_MS: u64 = 500;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spaces inserted by tab and indent, and the most removed by outdent.
    pub tab_stop: usize,
    /// Window within which repeated clicks count as a multi-click.
    pub double_click_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            double_click_ms: DOUBLE_CLICK_MS,
        }
    }
}

impl EngineConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the tab stop.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    /// Builder method to set the multi-click window.
    pub fn with_double_click(mut self, window: Duration) -> Self {
        self.double_click_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The multi-click window as a duration.
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// The text inserted by a tab.
    pub fn tab_text(&self) -> String {
        " ".repeat(self.tab_stop)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.tab_stop == 0 {
            return Err(Error::Config("tab_stop must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
