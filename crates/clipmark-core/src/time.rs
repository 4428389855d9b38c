//! Time values on the recording timeline.
//!
//! All times are seconds as `f64`, measured from the start of the recording.
//! A [`TimeRange`] may be half-open while the operator is still placing its
//! second boundary, so both ends are optional.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clamp a time value into `[0, duration]`.
///
/// Non-finite input collapses to zero so a bad pointer coordinate can never
/// poison the range state.
#[inline]
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    if !time.is_finite() {
        return 0.0;
    }
    let upper = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    time.clamp(0.0, upper)
}

/// Format seconds as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// One of the two boundaries of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    Start,
    End,
}

/// A possibly incomplete `(start, end)` pair in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl TimeRange {
    /// Range with neither boundary placed.
    pub const EMPTY: Self = Self {
        start: None,
        end: None,
    };

    /// A fully defined range. Boundaries are stored as given.
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// A range with only its start placed.
    #[inline]
    pub fn starting_at(start: f64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Neither boundary is placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both boundaries are placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both boundaries, if placed.
    #[inline]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.start?, self.end?))
    }

    /// Read one boundary.
    pub fn get(&self, boundary: Boundary) -> Option<f64> {
        match boundary {
            Boundary::Start => self.start,
            Boundary::End => self.end,
        }
    }

    /// Overwrite one boundary, leaving the other untouched.
    pub fn set(&mut self, boundary: Boundary, value: f64) {
        match boundary {
            Boundary::Start => self.start = Some(value),
            Boundary::End => self.end = Some(value),
        }
    }

    /// Swap the boundaries if they are inverted.
    pub fn normalized(self) -> Self {
        match self.bounds() {
            Some((start, end)) if start > end => Self::new(end, start),
            _ => self,
        }
    }

    /// Width in seconds of a complete range (after normalization).
    pub fn width(&self) -> Option<f64> {
        self.bounds().map(|(s, e)| (e - s).abs())
    }

    /// Check if a time lies inside a complete range.
    pub fn contains(&self, time: f64) -> bool {
        match self.normalized().bounds() {
            Some((start, end)) => time >= start && time <= end,
            None => false,
        }
    }

    /// Both boundaries lie within `tolerance` of `(start, end)`.
    pub fn matches_within(&self, start: f64, end: f64, tolerance: f64) -> bool {
        match self.bounds() {
            Some((s, e)) => (s - start).abs() <= tolerance && (e - end).abs() <= tolerance,
            None => false,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| match v {
            Some(t) => format!("{:.3}s", t),
            None => "-".to_string(),
        };
        write!(f, "[{} .. {}]", show(self.start), show(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_time() {
        assert_eq!(clamp_time(-3.0, 120.0), 0.0);
        assert_eq!(clamp_time(130.0, 120.0), 120.0);
        assert_eq!(clamp_time(42.5, 120.0), 42.5);
        assert_eq!(clamp_time(f64::NAN, 120.0), 0.0);
        assert_eq!(clamp_time(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_normalized_swaps_inverted() {
        let range = TimeRange::new(10.0, 5.0).normalized();
        assert_eq!(range.bounds(), Some((5.0, 10.0)));
    }

    #[test]
    fn test_partial_range() {
        let range = TimeRange::starting_at(3.0);
        assert!(!range.is_complete());
        assert!(!range.is_empty());
        assert_eq!(range.width(), None);
        assert_eq!(range.normalized(), range);
    }

    #[test]
    fn test_matches_within() {
        let range = TimeRange::new(5.0, 10.0);
        assert!(range.matches_within(5.05, 9.95, 0.1));
        assert!(!range.matches_within(5.2, 10.0, 0.1));
        assert!(!TimeRange::EMPTY.matches_within(0.0, 0.0, 0.1));
    }

    #[test]
    fn test_set_boundary() {
        let mut range = TimeRange::new(1.0, 2.0);
        range.set(Boundary::End, 8.0);
        assert_eq!(range.get(Boundary::End), Some(8.0));
        assert_eq!(range.get(Boundary::Start), Some(1.0));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(3725.0), "1:02:05");
        assert_eq!(format_clock(-4.0), "0:00");
    }

    proptest! {
        #[test]
        fn normalized_is_ordered(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
            let (start, end) = TimeRange::new(a, b).normalized().bounds().unwrap();
            prop_assert!(start <= end);
        }

        #[test]
        fn clamp_stays_in_bounds(t in proptest::num::f64::ANY, d in 0.0f64..1.0e5) {
            let clamped = clamp_time(t, d);
            prop_assert!((0.0..=d).contains(&clamped));
        }
    }
}
