//! Ordered clip collection with selection, in-place editing and the
//! debounced auto-commit of completed ranges.
//!
//! The registry never owns the [`RangeModel`]; operations that change the
//! selection take it by `&mut` and mirror the selected clip's bounds into
//! it so the marker UI can display and adjust them.

use std::time::Instant;

use clipmark_core::{ClipmarkError, EditorConfig, OneShotTimer, Result};
use tracing::{debug, info, warn};

use crate::clip::{Clip, ClipId};
use crate::range::{CommitKind, RangeCommit, RangeModel};

/// What happened to a committed range.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The clip in edit mode (or the selected clip) took the new bounds.
    Updated(ClipId),
    /// An existing clip already covers the range; it is now selected.
    SelectedExisting(ClipId),
    /// A new clip will be created once the debounce window passes.
    CreationScheduled,
    /// Too narrow or a duplicate of another clip; nothing changed.
    Rejected,
}

/// Result of a select request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(ClipId),
    Deselected,
    /// Selection is locked (edit or gesture in progress) or the id is unknown.
    Unchanged,
}

/// Bookkeeping for the clip currently in edit mode.
#[derive(Debug, Clone)]
struct EditSession {
    id: ClipId,
    /// Bounds when the edit started, restored on cancel.
    original: (f64, f64),
    /// A drag changed the bounds during this edit.
    resized: bool,
}

/// The clip list of one editing session.
#[derive(Debug)]
pub struct ClipRegistry {
    clips: Vec<Clip>,
    selected: Option<ClipId>,
    editing: Option<EditSession>,
    pending: OneShotTimer<(f64, f64)>,
    config: EditorConfig,
}

impl ClipRegistry {
    /// Create an empty registry.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            clips: Vec::new(),
            selected: None,
            editing: None,
            pending: OneShotTimer::new(),
            config,
        }
    }

    /// Create a registry from persisted clips. Invalid entries are skipped.
    pub fn seeded(config: EditorConfig, clips: impl IntoIterator<Item = Clip>) -> Self {
        let mut registry = Self::new(config);
        registry.load(clips);
        info!(count = registry.clips.len(), "clip registry seeded");
        registry
    }

    /// Replace the clip list with an authoritative copy from the store.
    ///
    /// Selection and edit mode survive only if their clip is still present.
    pub fn refresh(&mut self, clips: impl IntoIterator<Item = Clip>, range: &mut RangeModel) {
        self.load(clips);
        self.reconcile_selection(range);
    }

    /// Drop clips that end past the recording once its duration is known.
    ///
    /// Returns how many clips were removed.
    pub fn retain_within(&mut self, duration: f64, range: &mut RangeModel) -> usize {
        let before = self.clips.len();
        self.clips.retain(|clip| match clip.validate(Some(duration)) {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %clip.id, "dropping clip outside the recording: {}", e);
                false
            }
        });
        let dropped = before - self.clips.len();
        if dropped > 0 {
            self.reconcile_selection(range);
        }
        dropped
    }

    /// Forget selection or edit state whose clip is gone, then re-mirror.
    fn reconcile_selection(&mut self, range: &mut RangeModel) {
        let edit_alive = self
            .editing
            .as_ref()
            .is_some_and(|edit| self.index_of(&edit.id).is_some());
        if !edit_alive {
            self.editing = None;
        }
        let Some(id) = self.selected.clone() else {
            return;
        };
        let bounds = self.get(&id).map(|clip| (clip.start, clip.end));
        if bounds.is_none() {
            self.selected = None;
            self.editing = None;
        }
        if range.is_gesture_active() {
            return;
        }
        match bounds {
            Some((start, end)) => range.mirror(start, end),
            None => range.clear(),
        }
    }

    fn load(&mut self, clips: impl IntoIterator<Item = Clip>) {
        self.clips.clear();
        for clip in clips {
            if let Err(e) = clip.validate(None) {
                warn!(id = %clip.id, "skipping invalid clip: {}", e);
                continue;
            }
            if self.index_of(&clip.id).is_some() {
                warn!(id = %clip.id, "skipping clip with duplicate id");
                continue;
            }
            self.clips.push(clip);
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Clips in creation order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| &clip.id == id)
    }

    /// Selected clip id. A clip in edit mode is always the selected one.
    pub fn selected(&self) -> Option<&ClipId> {
        self.selected.as_ref()
    }

    /// Id of the clip in edit mode.
    pub fn editing(&self) -> Option<&ClipId> {
        self.editing.as_ref().map(|edit| &edit.id)
    }

    pub fn is_selected(&self, id: &ClipId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_editing(&self, id: &ClipId) -> bool {
        self.editing() == Some(id)
    }

    /// A clip is selected without being edited.
    pub fn is_previewing(&self) -> bool {
        self.selected.is_some() && self.editing.is_none()
    }

    /// A completed range is waiting for its creation debounce.
    pub fn has_pending_creation(&self) -> bool {
        self.pending.is_pending()
    }

    /// Time until the pending creation fires.
    pub fn pending_remaining(&self, now: Instant) -> Option<std::time::Duration> {
        self.pending.remaining(now)
    }

    /// Range waiting to become a clip.
    pub fn pending_range(&self) -> Option<(f64, f64)> {
        self.pending.payload().copied()
    }

    /// First clip whose bounds both lie within the dedupe tolerance.
    pub fn find_duplicate(&self, start: f64, end: f64) -> Option<&Clip> {
        self.find_duplicate_except(start, end, None)
    }

    fn find_duplicate_except(&self, start: f64, end: f64, except: Option<&ClipId>) -> Option<&Clip> {
        let tolerance = self.config.dedupe_tolerance_secs;
        self.clips
            .iter()
            .filter(|clip| Some(&clip.id) != except)
            .find(|clip| clip.matches(start, end, tolerance))
    }

    fn index_of(&self, id: &ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| &clip.id == id)
    }

    // ── Auto-commit ─────────────────────────────────────────────

    /// React to a committed range from the range model.
    pub fn on_range_completed(
        &mut self,
        commit: RangeCommit,
        range: &mut RangeModel,
        now: Instant,
    ) -> CommitOutcome {
        let (start, end) = (commit.start, commit.end);

        if commit.width() <= 0.0 || commit.width() < self.config.min_clip_secs {
            debug!(start, end, "range below minimum width discarded");
            self.restore_mirror(range);
            return CommitOutcome::Rejected;
        }

        // Resize in place: the clip in edit mode, or a selected clip whose
        // marker was dragged while the drag lock is off.
        let target = match (&self.editing, &self.selected, commit.kind) {
            (Some(edit), _, _) => Some(edit.id.clone()),
            (None, Some(id), CommitKind::Drag) => {
                if self.config.lock_selected_clip_drag {
                    debug!(id = %id, "drag on a locked clip discarded");
                    self.restore_mirror(range);
                    return CommitOutcome::Rejected;
                }
                Some(id.clone())
            }
            _ => None,
        };
        if let Some(id) = target {
            return self.resize(&id, start, end, range);
        }

        if let Some(existing) = self.find_duplicate(start, end) {
            let id = existing.id.clone();
            let (s, e) = (existing.start, existing.end);
            if let Some((ps, pe)) = self.pending.cancel() {
                debug!(start = ps, end = pe, "pending clip creation superseded");
            }
            self.selected = Some(id.clone());
            range.mirror(s, e);
            debug!(id = %id, "range matches existing clip");
            return CommitOutcome::SelectedExisting(id);
        }

        if let Some((ps, pe)) =
            self.pending
                .schedule(now, self.config.creation_debounce(), (start, end))
        {
            debug!(start = ps, end = pe, "pending clip creation replaced");
        }
        debug!(start, end, "clip creation scheduled");
        CommitOutcome::CreationScheduled
    }

    /// Create the pending clip once its debounce window has passed.
    ///
    /// Waits while a gesture owns the range: the gesture's own commit will
    /// replace the pending value.
    pub fn poll(&mut self, range: &mut RangeModel, now: Instant) -> Option<ClipId> {
        if range.is_gesture_active() {
            return None;
        }
        let (start, end) = self.pending.poll(now)?;
        self.create(start, end, range)
    }

    /// Create the pending clip immediately, ignoring the debounce window.
    pub fn flush_pending(&mut self, range: &mut RangeModel) -> Option<ClipId> {
        if range.is_gesture_active() {
            return None;
        }
        let (start, end) = self.pending.cancel()?;
        self.create(start, end, range)
    }

    fn create(&mut self, start: f64, end: f64, range: &mut RangeModel) -> Option<ClipId> {
        if let Some(existing) = self.find_duplicate(start, end) {
            let id = existing.id.clone();
            let (s, e) = (existing.start, existing.end);
            self.selected = Some(id.clone());
            range.mirror(s, e);
            return None;
        }

        let name = self.config.clip_name(self.clips.len() + 1);
        let clip = match Clip::new(name, start, end) {
            Ok(clip) => clip,
            Err(e) => {
                debug!("pending clip dropped: {}", e);
                range.clear();
                return None;
            }
        };
        let id = clip.id.clone();
        info!(id = %id, name = %clip.name, start, end, "clip created");
        self.clips.push(clip);
        self.selected = Some(id.clone());
        self.editing = Some(EditSession {
            id: id.clone(),
            original: (start, end),
            resized: false,
        });
        range.mirror(start, end);
        Some(id)
    }

    fn resize(&mut self, id: &ClipId, start: f64, end: f64, range: &mut RangeModel) -> CommitOutcome {
        if self.find_duplicate_except(start, end, Some(id)).is_some() {
            debug!(id = %id, start, end, "resize would duplicate another clip");
            self.restore_mirror(range);
            return CommitOutcome::Rejected;
        }
        let Some(index) = self.index_of(id) else {
            // Clip vanished under an external refresh.
            self.editing = None;
            self.selected = None;
            range.clear();
            return CommitOutcome::Rejected;
        };
        if let Err(e) = self.clips[index].set_bounds(start, end) {
            debug!(id = %id, "resize rejected: {}", e);
            self.restore_mirror(range);
            return CommitOutcome::Rejected;
        }
        if let Some(edit) = self.editing.as_mut().filter(|edit| &edit.id == id) {
            edit.resized = true;
        }
        debug!(id = %id, start, end, "clip resized in place");
        CommitOutcome::Updated(id.clone())
    }

    /// Put the range back to whatever the current selection shows.
    fn restore_mirror(&self, range: &mut RangeModel) {
        match self.selected.as_ref().and_then(|id| self.get(id)) {
            Some(clip) => range.mirror(clip.start, clip.end),
            None => range.clear(),
        }
    }

    // ── Selection & editing ─────────────────────────────────────

    /// Toggle selection of a clip.
    pub fn select_clip(&mut self, id: &ClipId, range: &mut RangeModel) -> SelectionChange {
        if self.editing.is_some() || range.is_gesture_active() {
            debug!(id = %id, "selection locked");
            return SelectionChange::Unchanged;
        }
        let Some(clip) = self.get(id) else {
            return SelectionChange::Unchanged;
        };
        let (start, end) = (clip.start, clip.end);

        if self.pending.cancel().is_some() {
            debug!("pending clip creation dropped by selection");
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            range.clear();
            SelectionChange::Deselected
        } else {
            self.selected = Some(id.clone());
            range.mirror(start, end);
            SelectionChange::Selected(id.clone())
        }
    }

    /// Enter edit mode (rename and resize) on a clip.
    pub fn begin_edit(&mut self, id: &ClipId, range: &mut RangeModel) -> bool {
        if range.is_gesture_active() {
            return false;
        }
        if let Some(edit) = &self.editing {
            return &edit.id == id;
        }
        let Some(clip) = self.get(id) else {
            return false;
        };
        let (start, end) = (clip.start, clip.end);
        self.pending.cancel();
        self.selected = Some(id.clone());
        self.editing = Some(EditSession {
            id: id.clone(),
            original: (start, end),
            resized: false,
        });
        range.mirror(start, end);
        debug!(id = %id, "edit started");
        true
    }

    /// Apply a new name and close edit mode.
    ///
    /// Bounds are taken from the range model only if a drag resized the
    /// clip during this edit.
    pub fn commit_edit(&mut self, id: &ClipId, name: &str, range: &mut RangeModel) -> Result<()> {
        let edit = match &self.editing {
            Some(edit) if &edit.id == id => edit.clone(),
            _ => {
                return Err(ClipmarkError::NotFound(format!(
                    "clip {} is not being edited",
                    id
                )))
            }
        };
        let Some(index) = self.index_of(id) else {
            self.editing = None;
            self.selected = None;
            range.clear();
            return Err(ClipmarkError::NotFound(format!("clip {}", id)));
        };

        let mut updated = self.clips[index].clone();
        updated.rename(name)?;
        if edit.resized {
            if let Some((start, end)) = range.range().normalized().bounds() {
                if self.find_duplicate_except(start, end, Some(id)).is_none() {
                    // Bounds already passed the resize checks; ignore a stale mirror.
                    let _ = updated.set_bounds(start, end);
                }
            }
        }
        let (start, end) = (updated.start, updated.end);
        info!(id = %id, name = %updated.name, "clip edit committed");
        self.clips[index] = updated;
        self.editing = None;
        self.selected = Some(id.clone());
        if !range.is_gesture_active() {
            range.mirror(start, end);
        }
        Ok(())
    }

    /// Leave edit mode, rolling the clip back to its pre-edit bounds.
    pub fn cancel_edit(&mut self, id: &ClipId, range: &mut RangeModel) -> bool {
        let edit = match self.editing.take() {
            Some(edit) if &edit.id == id => edit,
            other => {
                self.editing = other;
                return false;
            }
        };
        let (start, end) = edit.original;
        if let Some(index) = self.index_of(id) {
            let _ = self.clips[index].set_bounds(start, end);
        }
        if range.is_gesture_active() {
            range.cancel();
        }
        if self.is_selected(id) && self.index_of(id).is_some() {
            range.mirror(start, end);
        } else {
            range.clear();
        }
        debug!(id = %id, "edit cancelled");
        true
    }

    /// Remove a clip. Unknown ids are ignored.
    pub fn delete_clip(&mut self, id: &ClipId, range: &mut RangeModel) -> Option<Clip> {
        let index = self.index_of(id)?;
        let removed = self.clips.remove(index);
        let was_active = self.is_selected(id) || self.is_editing(id);
        if self.is_editing(id) {
            self.editing = None;
        }
        if was_active {
            self.selected = None;
            range.clear();
        }
        info!(id = %id, name = %removed.name, "clip deleted");
        Some(removed)
    }

    /// Forget selection, edit mode and any pending creation.
    pub fn reset_interaction(&mut self) {
        self.selected = None;
        self.editing = None;
        self.pending.cancel();
    }

    /// Ordered clip list for the external store.
    pub fn export(&self) -> Vec<Clip> {
        self.clips
            .iter()
            .map(|clip| {
                let mut clip = clip.clone();
                clip.name = clip.name.trim().to_string();
                clip
            })
            .collect()
    }
}
