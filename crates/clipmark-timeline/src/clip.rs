//! Named sub-ranges of a recording.

use chrono::{DateTime, Utc};
use clipmark_core::{ClipmarkError, Result, TimeRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable clip identifier.
///
/// Clips created here get a UUID; clips seeded from the external store keep
/// whatever id string the store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    /// Generate a fresh, never-reused id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClipId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named interval of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Clip name (displayed in the clip list)
    pub name: String,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Clip {
    /// Create a new clip with a fresh id.
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Result<Self> {
        Self::with_id(ClipId::generate(), name, start, end, Utc::now())
    }

    /// Build a clip with a known id, e.g. one loaded from the external store.
    pub fn with_id(
        id: ClipId,
        name: impl Into<String>,
        start: f64,
        end: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        check_bounds(start, end)?;
        Ok(Self {
            id,
            start,
            end,
            name: name.into(),
            created_at,
        })
    }

    /// Bounds as a complete [`TimeRange`].
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Both bounds lie within `tolerance` of `(start, end)`.
    pub fn matches(&self, start: f64, end: f64, tolerance: f64) -> bool {
        self.range().matches_within(start, end, tolerance)
    }

    /// Move both bounds. The id is never touched.
    pub fn set_bounds(&mut self, start: f64, end: f64) -> Result<()> {
        check_bounds(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Rename the clip. Surrounding whitespace is dropped; blank names are rejected.
    pub fn rename(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ClipmarkError::InvalidName(
                "clip name must not be empty".into(),
            ));
        }
        self.name = trimmed.to_string();
        Ok(())
    }

    /// Check the clip against a known recording duration.
    pub fn validate(&self, duration: Option<f64>) -> Result<()> {
        check_bounds(self.start, self.end)?;
        if let Some(duration) = duration {
            if self.end > duration {
                return Err(ClipmarkError::InvalidRange(format!(
                    "clip {} ends at {:.3}s past the recording end {:.3}s",
                    self.id, self.end, duration
                )));
            }
        }
        if self.name.trim().is_empty() {
            return Err(ClipmarkError::InvalidName(format!(
                "clip {} has an empty name",
                self.id
            )));
        }
        Ok(())
    }
}

fn check_bounds(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ClipmarkError::InvalidRange(format!(
            "non-finite bounds ({}, {})",
            start, end
        )));
    }
    if start < 0.0 || start >= end {
        return Err(ClipmarkError::InvalidRange(format!(
            "expected 0 <= start < end, got ({:.3}, {:.3})",
            start, end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clip_has_unique_id() {
        let a = Clip::new("a", 1.0, 2.0).unwrap();
        let b = Clip::new("a", 1.0, 2.0).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.duration(), 1.0);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(Clip::new("x", 5.0, 5.0).is_err());
        assert!(Clip::new("x", 6.0, 5.0).is_err());
        assert!(Clip::new("x", -1.0, 5.0).is_err());
        assert!(Clip::new("x", 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_rename_trims_and_rejects_blank() {
        let mut clip = Clip::new("old", 1.0, 2.0).unwrap();
        let id = clip.id.clone();
        clip.rename("  상담 도입부 ").unwrap();
        assert_eq!(clip.name, "상담 도입부");
        assert!(clip.rename("   ").is_err());
        assert_eq!(clip.name, "상담 도입부");
        assert_eq!(clip.id, id);
    }

    #[test]
    fn test_set_bounds_keeps_id() {
        let mut clip = Clip::new("c", 5.0, 10.0).unwrap();
        let id = clip.id.clone();
        clip.set_bounds(5.0, 20.0).unwrap();
        assert_eq!(clip.id, id);
        assert_eq!(clip.end, 20.0);
        assert!(clip.set_bounds(20.0, 5.0).is_err());
        assert_eq!(clip.end, 20.0);
    }

    #[test]
    fn test_validate_against_duration() {
        let clip = Clip::new("c", 100.0, 130.0).unwrap();
        assert!(clip.validate(None).is_ok());
        assert!(clip.validate(Some(120.0)).is_err());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let clip = Clip::with_id("42".into(), "intro", 1.5, 3.0, Utc::now()).unwrap();
        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["id"], "42");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_missing_created_at_defaults() {
        let clip: Clip =
            serde_json::from_str(r#"{ "id": "7", "start": 1.0, "end": 2.0, "name": "n" }"#)
                .unwrap();
        assert_eq!(clip.id.as_str(), "7");
    }
}
