//! Media backends: the playable resource behind the transport.
//!
//! Decoding and output are owned by the host. A backend only exposes the
//! control surface of a media element and reports what happened to it as
//! [`MediaEvent`]s, which the transport drains on every tick.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use clipmark_core::{clamp_time, ClipmarkError, Result};
use serde::{Deserialize, Serialize};

/// Reference to the recording being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Location understood by the backend (path or URL).
    pub uri: String,
    /// Duration known ahead of metadata, if any.
    pub duration_hint: Option<f64>,
}

impl MediaSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            duration_hint: None,
        }
    }

    pub fn with_duration_hint(mut self, duration: f64) -> Self {
        self.duration_hint = Some(duration);
        self
    }
}

/// Something the media element reported.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration became known.
    LoadedMetadata(f64),
    /// Playback position moved.
    TimeUpdate(f64),
    /// Playback reached the end of the resource.
    Ended,
    /// The resource cannot be read or played.
    Error(String),
}

/// Control surface of a media element.
pub trait MediaBackend {
    /// Start loading a resource. Metadata arrives later as an event.
    fn load(&mut self, source: &MediaSource) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    fn set_volume(&mut self, volume: f32);
    fn set_playback_rate(&mut self, rate: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> Option<f64>;
    fn is_playing(&self) -> bool;
    /// Drain events produced since the last call.
    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent>;
}

/// A media element that plays by following the wall clock.
///
/// Produces no sound; it gives the editor a transport that behaves like a
/// real element (metadata, time updates, end of stream) for tests and for
/// hosts that render audio elsewhere.
#[derive(Debug)]
pub struct ClockBackend {
    duration: f64,
    position: f64,
    playing: bool,
    rate: f64,
    volume: f32,
    loaded: bool,
    failure: Option<String>,
    last_tick: Option<Instant>,
    events: VecDeque<MediaEvent>,
}

impl ClockBackend {
    /// A resource of `duration` seconds that loads successfully.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: clamp_time(duration, f64::MAX),
            position: 0.0,
            playing: false,
            rate: 1.0,
            volume: 1.0,
            loaded: false,
            failure: None,
            last_tick: None,
            events: VecDeque::new(),
        }
    }

    /// A resource that fails to load with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(0.0)
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn advance(&mut self, elapsed: Duration) {
        self.position += elapsed.as_secs_f64() * self.rate;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.events.push_back(MediaEvent::Ended);
        } else {
            self.events.push_back(MediaEvent::TimeUpdate(self.position));
        }
    }
}

impl MediaBackend for ClockBackend {
    fn load(&mut self, source: &MediaSource) -> Result<()> {
        self.position = 0.0;
        self.playing = false;
        self.last_tick = None;
        match &self.failure {
            Some(message) => {
                self.events.push_back(MediaEvent::Error(format!(
                    "{}: {}",
                    source.uri, message
                )));
            }
            None => {
                self.loaded = true;
                self.events.push_back(MediaEvent::LoadedMetadata(self.duration));
            }
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(ClipmarkError::Media(message.clone()));
        }
        if !self.loaded {
            return Err(ClipmarkError::Media("resource not loaded".into()));
        }
        self.playing = true;
        self.last_tick = None;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    fn seek(&mut self, time: f64) {
        self.position = clamp_time(time, self.duration);
        self.events.push_back(MediaEvent::TimeUpdate(self.position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.loaded.then_some(self.duration)
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent> {
        if self.playing {
            if let Some(last) = self.last_tick {
                self.advance(now.saturating_duration_since(last));
            }
            self.last_tick = Some(now);
        }
        self.events.drain(..).collect()
    }
}
