//! Clip list serialization with versioning and migration.
//!
//! Uses JSON with a schema version field. Version 0 is the bare array of
//! clips the admin screens stored before the wrapper existed.

use clipmark_core::{ClipmarkError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned clip list wrapper.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipFile {
    /// Schema version for migration.
    pub version: u32,
    /// Clips in creation order.
    pub clips: Vec<Clip>,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ClipFile {
    /// Wrap a clip list.
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            version: CURRENT_VERSION,
            clips,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ClipmarkError::Serialization(format!("Failed to serialize clips: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ClipmarkError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = match raw.get("version") {
            None => 0,
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    ClipmarkError::Serialization(format!("Invalid clip file version: {}", v))
                })?,
        };

        if version > CURRENT_VERSION {
            return Err(ClipmarkError::Serialization(format!(
                "Clip file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| ClipmarkError::Serialization(format!("Failed to parse clips: {}", e)))
    }

    /// Save to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: the whole document is the clip array
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "clips": data,
                        "appVersion": "0.0.0",
                    });
                } else {
                    return Err(ClipmarkError::Serialization(
                        "Unversioned clip file must be an array".into(),
                    ));
                }
                version = 1;
            }
            _ => {
                return Err(ClipmarkError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
