//! Editor tuning parameters.
//!
//! The dedupe tolerance and the two interaction delays were tuned by hand,
//! so they live here instead of being hard-coded in the interaction code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ClipmarkError, Result};

/// Configuration shared by every part of the interval editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Two ranges whose starts and ends both differ by at most this many
    /// seconds are the same clip.
    pub dedupe_tolerance_secs: f64,
    /// Delay between a completed range and the clip it creates.
    pub creation_debounce_ms: u64,
    /// Delay between pointer release and the end of a drag.
    pub release_settle_ms: u64,
    /// Narrowest range that may become or resize a clip.
    pub min_clip_secs: f64,
    /// Prefix for auto-generated clip names ("클립 1", "클립 2", ...).
    pub clip_name_prefix: String,
    /// Disallow marker drags while a clip is selected but not being edited.
    pub lock_selected_clip_drag: bool,
    /// Step used by the skip-forward/backward transport controls.
    pub skip_secs: f64,
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| ClipmarkError::Config(format!("Invalid editor config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.dedupe_tolerance_secs.is_finite() || self.dedupe_tolerance_secs < 0.0 {
            return Err(ClipmarkError::Config(format!(
                "dedupe_tolerance_secs must be a non-negative number, got {}",
                self.dedupe_tolerance_secs
            )));
        }
        if !self.min_clip_secs.is_finite() || self.min_clip_secs < 0.0 {
            return Err(ClipmarkError::Config(format!(
                "min_clip_secs must be a non-negative number, got {}",
                self.min_clip_secs
            )));
        }
        if !self.skip_secs.is_finite() || self.skip_secs <= 0.0 {
            return Err(ClipmarkError::Config(format!(
                "skip_secs must be positive, got {}",
                self.skip_secs
            )));
        }
        if self.clip_name_prefix.trim().is_empty() {
            return Err(ClipmarkError::Config(
                "clip_name_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Creation debounce as a [`Duration`].
    #[inline]
    pub fn creation_debounce(&self) -> Duration {
        Duration::from_millis(self.creation_debounce_ms)
    }

    /// Release settle delay as a [`Duration`].
    #[inline]
    pub fn release_settle(&self) -> Duration {
        Duration::from_millis(self.release_settle_ms)
    }

    /// Auto-generated name for the `n`-th clip (1-based).
    pub fn clip_name(&self, n: usize) -> String {
        format!("{} {}", self.clip_name_prefix.trim(), n)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dedupe_tolerance_secs: 0.1,
            creation_debounce_ms: 100,
            release_settle_ms: 50,
            min_clip_secs: 1.0,
            clip_name_prefix: "클립".to_string(),
            lock_selected_clip_drag: true,
            skip_secs: 5.0,
        }
    }
}
