//! One interval-editing session over a single recording.
//!
//! `EditorSession` owns the transport, the range model, the drag controller
//! and the clip registry, and routes host input between them. The host
//! drives it with pointer events and calls [`EditorSession::poll`] once per
//! frame; all delayed work (drag settle, creation debounce) happens there.

use std::time::{Duration, Instant};

use clipmark_audio::{MediaBackend, MediaSource, Transport, TransportEvent};
use clipmark_core::{Boundary, EditorConfig, Result, TimeRange, TrackGeometry};
use clipmark_timeline::{
    Clip, ClipFile, ClipId, ClipRegistry, CommitOutcome, EditMode, RangeModel, SelectionChange,
};
use tracing::{debug, info};

use crate::drag::{GestureToken, PointerDragController};

/// What a click on the track did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Swallowed: a drag just ended, a creation is pending, or controls are off.
    Ignored,
    /// Playback moved to this time.
    Seeked(f64),
    /// First boundary placed at this time.
    DefinitionStarted(f64),
    /// Second boundary placed; the range went to the registry.
    Committed(CommitOutcome),
}

/// Everything that happened during one [`EditorSession::poll`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollOutcome {
    pub transport: Vec<TransportEvent>,
    /// A settled drag was handed to the registry.
    pub commit: Option<CommitOutcome>,
    /// A pending range became this clip.
    pub created: Option<ClipId>,
}

impl PollOutcome {
    pub fn is_empty(&self) -> bool {
        self.transport.is_empty() && self.commit.is_none() && self.created.is_none()
    }
}

/// A clip as the list should render it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipView {
    pub clip: Clip,
    pub selected: bool,
    pub editing: bool,
}

/// Read-only state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub current_time: f64,
    pub duration: f64,
    pub playing: bool,
    pub volume: f32,
    pub playback_rate: f64,
    pub range: TimeRange,
    pub mode: EditMode,
    pub clips: Vec<ClipView>,
    pub marking: bool,
    pub pending_creation: Option<(f64, f64)>,
    pub error: Option<String>,
    pub controls_enabled: bool,
    pub drag_enabled: bool,
}

/// Interval editor state for one recording.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    transport: Transport,
    range: RangeModel,
    drag: PointerDragController,
    registry: ClipRegistry,
    marking: bool,
    closed: bool,
}

impl EditorSession {
    /// Load `source` into `backend` and seed the registry with stored clips.
    pub fn new(
        backend: Box<dyn MediaBackend>,
        source: MediaSource,
        seeds: Vec<Clip>,
        config: EditorConfig,
    ) -> Self {
        let mut transport = Transport::new(backend);
        transport.load(source);
        let range = RangeModel::new(transport.duration());
        let drag = PointerDragController::new(config.release_settle());
        let registry = ClipRegistry::seeded(config.clone(), seeds);
        Self {
            config,
            transport,
            range,
            drag,
            registry,
            marking: false,
            closed: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Subscribe to transport events (time updates, metadata, errors).
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<TransportEvent> {
        self.transport.subscribe()
    }

    pub fn range(&self) -> TimeRange {
        self.range.range()
    }

    pub fn mode(&self) -> EditMode {
        self.range.mode()
    }

    pub fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    pub fn clips(&self) -> &[Clip] {
        self.registry.clips()
    }

    pub fn is_marking(&self) -> bool {
        self.marking
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// A drag is live or settling.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_busy()
    }

    /// Controls work only while the session is open and the recording is healthy.
    pub fn controls_enabled(&self) -> bool {
        !self.closed && self.transport.error().is_none()
    }

    /// Markers accept drags: controls work and no clip is locked for preview.
    pub fn drag_enabled(&self) -> bool {
        self.controls_enabled()
            && self.range.range().is_complete()
            && !(self.config.lock_selected_clip_drag && self.registry.is_previewing())
    }

    /// Shortest time until `poll` has delayed work to do.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let settle = self.drag.settle_remaining(now);
        let pending = self.registry.pending_remaining(now);
        match (settle, pending) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Frame processing ────────────────────────────────────────

    /// Drain transport events and run due timers.
    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        if self.closed {
            return outcome;
        }

        for event in self.transport.tick(now) {
            if let TransportEvent::LoadedMetadata { duration } = event {
                self.range.set_duration(duration);
                let dropped = self.registry.retain_within(duration, &mut self.range);
                if dropped > 0 {
                    info!(dropped, duration, "stored clips past the recording end dropped");
                }
            }
            outcome.transport.push(event);
        }
        if self.transport.error().is_some() {
            self.abort_interaction();
            return outcome;
        }

        if let Some(commit) = self.drag.poll(&mut self.range, now) {
            outcome.commit = Some(self.registry.on_range_completed(commit, &mut self.range, now));
        }
        outcome.created = self.registry.poll(&mut self.range, now);
        outcome
    }

    // ── Track input ─────────────────────────────────────────────

    /// Tell the session where the track is drawn.
    pub fn set_track_geometry(&mut self, geometry: TrackGeometry) {
        self.drag.set_geometry(geometry);
    }

    pub fn track_geometry(&self) -> TrackGeometry {
        self.drag.geometry()
    }

    /// Switch between seeking and range marking on track clicks.
    ///
    /// Marking holds the transport's seek lock. Leaving marking mode drops a
    /// half-placed definition.
    pub fn set_marking(&mut self, marking: bool) {
        if !self.controls_enabled() || self.marking == marking {
            return;
        }
        self.marking = marking;
        self.transport.set_seek_disabled(marking);
        if !marking && self.range.mode() == EditMode::DefiningRange {
            self.range.cancel();
        }
        debug!(marking, "track click mode changed");
    }

    /// A click (press and release without a drag) on the track at `x`.
    pub fn track_click(&mut self, x: f32, now: Instant) -> ClickOutcome {
        if !self.controls_enabled() || self.drag.is_busy() {
            debug!(x, "track click ignored");
            return ClickOutcome::Ignored;
        }
        let time = self.drag.geometry().time_at_x(x, self.range.duration());

        if !self.marking {
            if self.transport.seek(time) {
                return ClickOutcome::Seeked(self.transport.current_time());
            }
            return ClickOutcome::Ignored;
        }

        // Markers belong to the selected clip until it is released.
        if self.registry.has_pending_creation() || self.registry.selected().is_some() {
            return ClickOutcome::Ignored;
        }

        let current = self.range.range();
        match (current.start, current.end) {
            (Some(_), None) => match self.range.complete_definition(time) {
                Ok(commit) => ClickOutcome::Committed(self.registry.on_range_completed(
                    commit,
                    &mut self.range,
                    now,
                )),
                Err(e) => {
                    debug!("definition not completed: {}", e);
                    ClickOutcome::Ignored
                }
            },
            _ => {
                // A leftover free range is replaced by the new definition.
                self.range.clear();
                match self.range.begin_definition(time) {
                    Ok(()) => ClickOutcome::DefinitionStarted(self.range.range().start.unwrap_or(time)),
                    Err(e) => {
                        debug!("definition not started: {}", e);
                        ClickOutcome::Ignored
                    }
                }
            }
        }
    }

    /// Pointer pressed on a boundary marker.
    pub fn marker_pointer_down(&mut self, target: Boundary) -> Option<GestureToken> {
        let enabled = self.drag_enabled();
        self.drag.pointer_down(target, enabled, &mut self.range)
    }

    /// Pointer moved while a marker gesture may be live.
    pub fn pointer_move(&mut self, token: GestureToken, x: f32) -> Option<f64> {
        self.drag.pointer_move(token, x, &mut self.range)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, token: GestureToken, now: Instant) -> bool {
        self.drag.pointer_up(token, now)
    }

    /// Range pushed by the host. Ignored while a gesture owns the range.
    pub fn apply_external_range(&mut self, range: TimeRange) -> bool {
        if self.closed || self.drag.is_busy() {
            return false;
        }
        self.range.apply_external(range)
    }

    // ── Clip list ───────────────────────────────────────────────

    pub fn select_clip(&mut self, id: &ClipId) -> SelectionChange {
        if !self.controls_enabled() || self.drag.is_busy() {
            return SelectionChange::Unchanged;
        }
        self.registry.select_clip(id, &mut self.range)
    }

    pub fn begin_edit(&mut self, id: &ClipId) -> bool {
        if !self.controls_enabled() || self.drag.is_busy() {
            return false;
        }
        self.registry.begin_edit(id, &mut self.range)
    }

    /// Save the edited name (and dragged bounds) of the clip in edit mode.
    ///
    /// A marker drag that has not settled yet is dropped: once the edit
    /// closes the clip is locked and must not take its bounds.
    pub fn commit_edit(&mut self, id: &ClipId, name: &str) -> Result<()> {
        if self.registry.is_editing(id) && self.drag.abort() {
            debug!(id = %id, "unsettled drag dropped on commit");
            if let Some(clip) = self.registry.get(id) {
                let (start, end) = (clip.start, clip.end);
                self.range.mirror(start, end);
            }
        }
        self.registry.commit_edit(id, name, &mut self.range)
    }

    pub fn cancel_edit(&mut self, id: &ClipId) -> bool {
        if self.registry.is_editing(id) {
            self.drag.abort();
        }
        self.registry.cancel_edit(id, &mut self.range)
    }

    /// Replace the clip list with an authoritative copy from the store.
    pub fn refresh_clips(&mut self, clips: Vec<Clip>) {
        if self.closed {
            return;
        }
        self.registry.refresh(clips, &mut self.range);
        if self.transport.is_ready() {
            self.registry
                .retain_within(self.transport.duration(), &mut self.range);
        }
    }

    pub fn delete_clip(&mut self, id: &ClipId) -> Option<Clip> {
        if self.closed {
            return None;
        }
        if self.registry.is_selected(id) {
            self.drag.abort();
        }
        self.registry.delete_clip(id, &mut self.range)
    }

    /// Play a clip's interval and pause at its end.
    pub fn play_clip(&mut self, id: &ClipId) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        let Some(clip) = self.registry.get(id) else {
            return false;
        };
        let (start, end) = (clip.start, clip.end);
        // Marking holds the seek lock; previewing a clip is allowed anyway.
        let locked = self.transport.is_seek_disabled();
        self.transport.set_seek_disabled(false);
        let started = self.transport.play_range(start, end);
        self.transport.set_seek_disabled(locked);
        started
    }

    // ── Transport ───────────────────────────────────────────────

    pub fn play(&mut self) -> bool {
        self.controls_enabled() && self.transport.play()
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.controls_enabled() && self.transport.toggle()
    }

    pub fn seek(&mut self, time: f64) -> bool {
        self.controls_enabled() && self.transport.seek(time)
    }

    pub fn rewind(&mut self) -> bool {
        self.controls_enabled() && self.transport.rewind()
    }

    pub fn skip_forward(&mut self) -> bool {
        self.controls_enabled() && self.transport.skip(self.config.skip_secs)
    }

    pub fn skip_backward(&mut self) -> bool {
        self.controls_enabled() && self.transport.skip(-self.config.skip_secs)
    }

    pub fn set_volume(&mut self, volume: f32) {
        if self.controls_enabled() {
            self.transport.set_volume(volume);
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        self.controls_enabled() && self.transport.set_playback_rate(rate)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Ordered clip list for persisting. A pending range is created first.
    pub fn save(&mut self) -> Vec<Clip> {
        if !self.closed {
            if let Some(id) = self.registry.flush_pending(&mut self.range) {
                debug!(id = %id, "pending clip flushed on save");
            }
        }
        self.registry.export()
    }

    /// Current clips wrapped for the clip file format.
    pub fn to_clip_file(&mut self) -> ClipFile {
        ClipFile::new(self.save())
    }

    /// Discard the session without committing anything.
    ///
    /// Live gestures, the settle timer and any pending creation are
    /// dropped; a clip resized during an unfinished edit gets its old
    /// bounds back.
    pub fn cancel(&mut self) {
        if self.closed {
            return;
        }
        self.abort_interaction();
        self.transport.pause();
        self.closed = true;
        info!(clips = self.registry.len(), "editor session cancelled");
    }

    fn abort_interaction(&mut self) {
        self.drag.abort();
        if let Some(id) = self.registry.editing().cloned() {
            self.registry.cancel_edit(&id, &mut self.range);
        }
        self.registry.reset_interaction();
        self.range.cancel();
        self.marking = false;
        self.transport.set_seek_disabled(false);
    }

    /// State for rendering the timeline and the clip list.
    pub fn snapshot(&self) -> EditorSnapshot {
        let clips = self
            .registry
            .clips()
            .iter()
            .map(|clip| ClipView {
                selected: self.registry.is_selected(&clip.id),
                editing: self.registry.is_editing(&clip.id),
                clip: clip.clone(),
            })
            .collect();
        EditorSnapshot {
            current_time: self.transport.current_time(),
            duration: self.transport.duration(),
            playing: self.transport.is_playing(),
            volume: self.transport.volume(),
            playback_rate: self.transport.playback_rate(),
            range: self.range.range(),
            mode: self.range.mode(),
            clips,
            marking: self.marking,
            pending_creation: self.registry.pending_range(),
            error: self.transport.error().map(str::to_owned),
            controls_enabled: self.controls_enabled(),
            drag_enabled: self.drag_enabled(),
        }
    }
}
