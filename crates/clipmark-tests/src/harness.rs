//! Scripted driver for an editor session.
//!
//! The track is 1200 px wide over a 120 s recording, so x = 10 * seconds.
//! Time only advances when a test says so.

use std::time::{Duration, Instant};

use clipmark_audio::{ClockBackend, MediaSource};
use clipmark_core::{Boundary, EditorConfig, TrackGeometry};
use clipmark_timeline::Clip;
use clipmark_ui::{ClickOutcome, EditorSession, PollOutcome};

pub const DURATION: f64 = 120.0;
pub const PX_PER_SEC: f32 = 10.0;

pub struct Harness {
    pub session: EditorSession,
    pub now: Instant,
}

impl Harness {
    pub fn new(seeds: Vec<Clip>) -> Self {
        Self::with_config(seeds, EditorConfig::default())
    }

    pub fn with_config(seeds: Vec<Clip>, config: EditorConfig) -> Self {
        let mut session = EditorSession::new(
            Box::new(ClockBackend::new(DURATION)),
            MediaSource::new("counseling-0412.m4a"),
            seeds,
            config,
        );
        session.set_track_geometry(TrackGeometry::new(0.0, DURATION as f32 * PX_PER_SEC));
        let now = Instant::now();
        session.poll(now);
        Self { session, now }
    }

    pub fn failing(message: &str) -> Self {
        let mut session = EditorSession::new(
            Box::new(ClockBackend::failing(message)),
            MediaSource::new("broken.m4a"),
            Vec::new(),
            EditorConfig::default(),
        );
        session.set_track_geometry(TrackGeometry::new(0.0, DURATION as f32 * PX_PER_SEC));
        let now = Instant::now();
        Self { session, now }
    }

    pub fn advance(&mut self, ms: u64) -> PollOutcome {
        self.now += Duration::from_millis(ms);
        self.session.poll(self.now)
    }

    pub fn click_at(&mut self, secs: f64) -> ClickOutcome {
        self.session.track_click(secs as f32 * PX_PER_SEC, self.now)
    }

    /// Define a range by two clicks in marking mode and wait for the clip.
    pub fn mark(&mut self, first: f64, second: f64) -> PollOutcome {
        self.session.set_marking(true);
        self.click_at(first);
        self.click_at(second);
        self.advance(150)
    }

    /// Press a marker, move through `path`, release. Does not wait for the settle delay.
    pub fn drag(&mut self, target: Boundary, path: &[f64]) -> bool {
        let Some(token) = self.session.marker_pointer_down(target) else {
            return false;
        };
        for &secs in path {
            self.session.pointer_move(token, secs as f32 * PX_PER_SEC);
        }
        self.session.pointer_up(token, self.now)
    }
}
