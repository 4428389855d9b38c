//! Clipmark UI - interval editor session and egui widgets
//!
//! - `drag`: marker drag gestures with a release settle delay
//! - `editor`: the session that ties transport, range, and clips together
//! - `timeline`, `clip_list`, `transport_bar`: egui views over the session

pub mod clip_list;
pub mod drag;
pub mod editor;
pub mod theme;
pub mod timeline;
pub mod transport_bar;
pub mod widgets;

pub use clip_list::{apply_actions, show_clip_list, ClipListAction, ClipListState};
pub use drag::{GestureToken, PointerDragController};
pub use editor::{ClickOutcome, ClipView, EditorSession, EditorSnapshot, PollOutcome};
pub use theme::Theme;
pub use timeline::{show_timeline, TimelineState};
pub use transport_bar::show_transport_bar;
