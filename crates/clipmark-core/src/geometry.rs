//! Mapping between screen coordinates and timeline time.

use serde::{Deserialize, Serialize};

use crate::time::clamp_time;

/// Horizontal placement of the timeline track on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// Left edge of the track in screen pixels.
    pub left: f32,
    /// Track width in pixels.
    pub width: f32,
}

impl TrackGeometry {
    /// Create a new track geometry.
    #[inline]
    pub const fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Right edge of the track.
    #[inline]
    pub fn right(self) -> f32 {
        self.left + self.width
    }

    /// Convert a pointer x-coordinate to a time in `[0, duration]`.
    ///
    /// A collapsed track (zero or negative width) maps everything to zero.
    pub fn time_at_x(self, x: f32, duration: f64) -> f64 {
        if self.width <= 0.0 || !self.width.is_finite() {
            return 0.0;
        }
        let offset = f64::from(x - self.left);
        clamp_time(offset * duration / f64::from(self.width), duration)
    }

    /// Convert a time to an x-coordinate on the track.
    pub fn x_at_time(self, time: f64, duration: f64) -> f32 {
        if duration <= 0.0 || !duration.is_finite() {
            return self.left;
        }
        let ratio = clamp_time(time, duration) / duration;
        self.left + (ratio as f32) * self.width
    }
}
