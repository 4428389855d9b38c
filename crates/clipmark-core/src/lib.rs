//! Clipmark Core - Foundation types for the recording interval editor
//!
//! This crate provides the fundamental types used throughout Clipmark:
//! - Time representation (TimeRange, Boundary, clamping and formatting)
//! - Track geometry (pointer x-coordinate to time)
//! - Cancelable one-shot timers polled by the host event loop
//! - Editor configuration

pub mod config;
pub mod error;
pub mod geometry;
pub mod time;
pub mod timer;

pub use config::EditorConfig;
pub use error::{ClipmarkError, Result};
pub use geometry::TrackGeometry;
pub use time::{clamp_time, format_clock, Boundary, TimeRange};
pub use timer::OneShotTimer;
