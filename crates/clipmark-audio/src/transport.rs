//! Playback transport over a [`MediaBackend`].
//!
//! The transport never surfaces backend faults as errors to its callers. A
//! resource that cannot be loaded or played puts the transport into a
//! persistent failed state; every control is a no-op from then on and the
//! host shows [`Transport::error`].

use std::time::Instant;

use clipmark_core::clamp_time;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::media::{MediaBackend, MediaEvent, MediaSource};

/// Something observers of the transport should render.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    TimeUpdate { current: f64, duration: f64 },
    LoadedMetadata { duration: f64 },
    /// Playback finished and rewound to the start.
    Ended,
    /// The resource failed; controls are now disabled.
    Error { message: String },
}

/// Play/pause, seek, volume and rate control for one recording.
pub struct Transport {
    backend: Box<dyn MediaBackend>,
    source: Option<MediaSource>,
    current: f64,
    duration: f64,
    metadata_loaded: bool,
    playing: bool,
    volume: f32,
    rate: f64,
    seek_disabled: bool,
    /// Pause when playback reaches this time (clip preview).
    stop_at: Option<f64>,
    error: Option<String>,
    subscribers: Vec<Sender<TransportEvent>>,
}

impl Transport {
    /// Create a transport around a backend. Nothing is loaded yet.
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self {
            backend,
            source: None,
            current: 0.0,
            duration: 0.0,
            metadata_loaded: false,
            playing: false,
            volume: 1.0,
            rate: 1.0,
            seek_disabled: false,
            stop_at: None,
            error: None,
            subscribers: Vec::new(),
        }
    }

    /// Start loading a recording. The duration hint is used until metadata arrives.
    pub fn load(&mut self, source: MediaSource) {
        info!(uri = %source.uri, "loading recording");
        self.current = 0.0;
        self.playing = false;
        self.stop_at = None;
        self.error = None;
        self.metadata_loaded = false;
        self.duration = source.duration_hint.map_or(0.0, |d| clamp_time(d, f64::MAX));
        if let Err(e) = self.backend.load(&source) {
            self.fail(e.to_string());
        }
        self.source = Some(source);
    }

    /// Receive every event this transport emits from now on.
    pub fn subscribe(&mut self) -> Receiver<TransportEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    // ── State ───────────────────────────────────────────────────

    pub fn current_time(&self) -> f64 {
        self.current
    }

    /// Authoritative duration once metadata loaded, the hint before that.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_ready(&self) -> bool {
        self.metadata_loaded && self.error.is_none()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    pub fn is_seek_disabled(&self) -> bool {
        self.seek_disabled
    }

    /// Error message once the resource has failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    // ── Controls ────────────────────────────────────────────────

    /// Start playback. Returns whether playback is running afterwards.
    pub fn play(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if !self.metadata_loaded {
            debug!("play ignored: recording not ready");
            return false;
        }
        match self.backend.play() {
            Ok(()) => {
                self.playing = true;
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.backend.pause();
            self.playing = false;
        }
        self.stop_at = None;
    }

    /// Toggle between play and pause.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Assert or release the seek lock held by a range-defining interaction.
    pub fn set_seek_disabled(&mut self, disabled: bool) {
        self.seek_disabled = disabled;
    }

    /// Jump to a time, clamped to `[0, duration]`.
    ///
    /// Ignored while seeking is disabled or the resource has failed.
    pub fn seek(&mut self, time: f64) -> bool {
        if self.error.is_some() || self.seek_disabled {
            debug!(time, "seek ignored");
            return false;
        }
        let time = clamp_time(time, self.duration);
        self.backend.seek(time);
        self.current = time;
        self.emit(TransportEvent::TimeUpdate {
            current: time,
            duration: self.duration,
        });
        true
    }

    /// Seek relative to the current position.
    pub fn skip(&mut self, delta: f64) -> bool {
        self.seek(self.current + delta)
    }

    /// Seek back to the start.
    pub fn rewind(&mut self) -> bool {
        self.seek(0.0)
    }

    /// Play `[start, end]` and pause at `end`.
    pub fn play_range(&mut self, start: f64, end: f64) -> bool {
        if !self.seek(start) {
            return false;
        }
        if !self.play() {
            return false;
        }
        self.stop_at = Some(clamp_time(end, self.duration));
        true
    }

    /// Set the output volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.volume = volume;
        self.backend.set_volume(volume);
    }

    /// Set the playback rate. Non-positive or non-finite rates are ignored.
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if !rate.is_finite() || rate <= 0.0 {
            debug!(rate, "playback rate rejected");
            return false;
        }
        self.rate = rate;
        self.backend.set_playback_rate(rate);
        true
    }

    // ── Event processing ────────────────────────────────────────

    /// Drain backend events and return what observers should see.
    pub fn tick(&mut self, now: Instant) -> Vec<TransportEvent> {
        let events = self.backend.poll_events(now);
        events
            .into_iter()
            .flat_map(|event| self.handle_media_event(event))
            .collect()
    }

    /// Apply a single event reported by the media element.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Vec<TransportEvent> {
        let mut out = Vec::new();
        if self.error.is_some() {
            return out;
        }
        match event {
            MediaEvent::LoadedMetadata(duration) => {
                if self.metadata_loaded {
                    return out;
                }
                self.metadata_loaded = true;
                self.duration = clamp_time(duration, f64::MAX);
                self.current = clamp_time(self.current, self.duration);
                info!(duration = self.duration, "recording metadata loaded");
                out.push(TransportEvent::LoadedMetadata {
                    duration: self.duration,
                });
            }
            MediaEvent::TimeUpdate(time) => {
                self.current = clamp_time(time, self.duration);
                if let Some(stop) = self.stop_at {
                    if self.playing && self.current >= stop {
                        self.backend.pause();
                        self.playing = false;
                        self.stop_at = None;
                        self.current = stop;
                    }
                }
                out.push(TransportEvent::TimeUpdate {
                    current: self.current,
                    duration: self.duration,
                });
            }
            MediaEvent::Ended => {
                // Rewind to the start instead of parking at the end.
                self.backend.pause();
                self.backend.seek(0.0);
                self.playing = false;
                self.stop_at = None;
                self.current = 0.0;
                out.push(TransportEvent::Ended);
                out.push(TransportEvent::TimeUpdate {
                    current: 0.0,
                    duration: self.duration,
                });
            }
            MediaEvent::Error(message) => {
                // `fail` already notified subscribers.
                self.fail(message.clone());
                return vec![TransportEvent::Error { message }];
            }
        }
        for event in &out {
            self.emit(event.clone());
        }
        out
    }

    fn fail(&mut self, message: String) {
        if self.error.is_some() {
            return;
        }
        warn!(%message, "recording failed");
        self.playing = false;
        self.stop_at = None;
        self.error = Some(message.clone());
        self.emit(TransportEvent::Error { message });
    }

    fn emit(&mut self, event: TransportEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("source", &self.source)
            .field("current", &self.current)
            .field("duration", &self.duration)
            .field("playing", &self.playing)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
