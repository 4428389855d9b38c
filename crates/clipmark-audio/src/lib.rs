//! Clipmark Audio - Playback transport
//!
//! Handles playback control of the recording being edited.
//!
//! Architecture:
//! - `MediaBackend`: control surface of the host's media element
//! - `ClockBackend`: wall-clock driven backend for tests and silent hosts
//! - `Transport`: play/pause, seek, volume, rate, and time reporting

pub mod media;
pub mod transport;

pub use media::{ClockBackend, MediaBackend, MediaEvent, MediaSource};
pub use transport::{Transport, TransportEvent};
