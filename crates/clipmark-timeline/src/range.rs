//! The range currently being defined, dragged, or mirrored from a clip.
//!
//! `RangeModel` is the only piece of interaction state shared by the drag
//! controller and the clip registry. It reports *committed* transitions
//! (a finished definition or a finished drag) as [`RangeCommit`] values;
//! intermediate drag positions are visible through [`RangeModel::range`]
//! but are never committed.

use clipmark_core::{clamp_time, Boundary, ClipmarkError, Result, TimeRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the operator is doing with the range right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Idle,
    /// First boundary placed by click, waiting for the second click.
    DefiningRange,
    DraggingStart,
    DraggingEnd,
}

impl EditMode {
    /// Drag mode for a boundary.
    pub fn dragging(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Start => Self::DraggingStart,
            Boundary::End => Self::DraggingEnd,
        }
    }

    /// Boundary being dragged, if any.
    pub fn drag_target(self) -> Option<Boundary> {
        match self {
            Self::DraggingStart => Some(Boundary::Start),
            Self::DraggingEnd => Some(Boundary::End),
            _ => None,
        }
    }

    pub fn is_dragging(self) -> bool {
        self.drag_target().is_some()
    }
}

/// How a range was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// Two clicks placed both boundaries.
    Definition,
    /// A boundary drag was released.
    Drag,
}

/// A committed, normalized range (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCommit {
    pub kind: CommitKind,
    pub start: f64,
    pub end: f64,
}

impl RangeCommit {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// In-progress `(start, end)` pair and interaction mode.
#[derive(Debug, Clone)]
pub struct RangeModel {
    range: TimeRange,
    mode: EditMode,
    duration: f64,
}

impl RangeModel {
    /// Create an empty, idle model for a recording of `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            range: TimeRange::EMPTY,
            mode: EditMode::Idle,
            duration: clamp_time(duration, f64::MAX),
        }
    }

    #[inline]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    #[inline]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// A definition or drag owns the range; outside writers must wait.
    #[inline]
    pub fn is_gesture_active(&self) -> bool {
        self.mode != EditMode::Idle
    }

    /// Update the recording duration (e.g. once metadata loads) and pull
    /// placed boundaries back inside it.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = clamp_time(duration, f64::MAX);
        self.range.start = self.range.start.map(|t| clamp_time(t, self.duration));
        self.range.end = self.range.end.map(|t| clamp_time(t, self.duration));
    }

    /// Place the first boundary of a new range.
    pub fn begin_definition(&mut self, time: f64) -> Result<()> {
        if self.mode != EditMode::Idle || self.range.start.is_some() {
            return Err(ClipmarkError::InvalidRange(format!(
                "cannot begin a definition in {:?} with range {}",
                self.mode, self.range
            )));
        }
        let time = clamp_time(time, self.duration);
        self.range = TimeRange::starting_at(time);
        self.mode = EditMode::DefiningRange;
        debug!(time, "range definition started");
        Ok(())
    }

    /// Place the second boundary and commit the definition.
    pub fn complete_definition(&mut self, time: f64) -> Result<RangeCommit> {
        let start = match (self.range.start, self.range.end) {
            (Some(start), None) => start,
            _ => {
                return Err(ClipmarkError::InvalidRange(format!(
                    "cannot complete a definition with range {}",
                    self.range
                )))
            }
        };
        let time = clamp_time(time, self.duration);
        self.range = TimeRange::new(start, time).normalized();
        self.mode = EditMode::Idle;
        let commit = self.commit(CommitKind::Definition);
        debug!(start = commit.start, end = commit.end, "range definition completed");
        Ok(commit)
    }

    /// Start dragging one boundary of a complete range.
    pub fn begin_drag(&mut self, boundary: Boundary) -> Result<()> {
        if self.mode != EditMode::Idle || !self.range.is_complete() {
            return Err(ClipmarkError::InvalidRange(format!(
                "cannot drag {:?} in {:?} with range {}",
                boundary, self.mode, self.range
            )));
        }
        self.mode = EditMode::dragging(boundary);
        Ok(())
    }

    /// Move the dragged boundary. The pair may be inverted until the drag ends.
    pub fn update_drag(&mut self, time: f64) -> Result<f64> {
        let boundary = self.mode.drag_target().ok_or_else(|| {
            ClipmarkError::InvalidRange(format!("no boundary is being dragged ({:?})", self.mode))
        })?;
        let time = clamp_time(time, self.duration);
        self.range.set(boundary, time);
        Ok(time)
    }

    /// Finish the drag, normalizing the pair.
    ///
    /// Returns `None` when no drag is active, so a repeated call never
    /// commits twice.
    pub fn end_drag(&mut self) -> Option<RangeCommit> {
        if !self.mode.is_dragging() {
            return None;
        }
        self.range = self.range.normalized();
        self.mode = EditMode::Idle;
        let commit = self.commit(CommitKind::Drag);
        debug!(start = commit.start, end = commit.end, "range drag completed");
        Some(commit)
    }

    /// Discard everything without committing.
    pub fn cancel(&mut self) {
        self.range = TimeRange::EMPTY;
        self.mode = EditMode::Idle;
    }

    /// Show a clip's bounds. Ends any definition in progress.
    pub fn mirror(&mut self, start: f64, end: f64) {
        self.range = TimeRange::new(
            clamp_time(start, self.duration),
            clamp_time(end, self.duration),
        )
        .normalized();
        self.mode = EditMode::Idle;
    }

    /// Clear back to `(None, None)`.
    pub fn clear(&mut self) {
        self.cancel();
    }

    /// Apply a range supplied by the host.
    ///
    /// Ignored while a definition or drag is active; returns whether the
    /// update was applied.
    pub fn apply_external(&mut self, range: TimeRange) -> bool {
        if self.is_gesture_active() {
            debug!(%range, mode = ?self.mode, "external range ignored during gesture");
            return false;
        }
        self.range = TimeRange {
            start: range.start.map(|t| clamp_time(t, self.duration)),
            end: range.end.map(|t| clamp_time(t, self.duration)),
        }
        .normalized();
        true
    }

    fn commit(&self, kind: CommitKind) -> RangeCommit {
        // Both bounds are placed whenever this is reached.
        let (start, end) = self.range.bounds().unwrap_or((0.0, 0.0));
        RangeCommit { kind, start, end }
    }
}
