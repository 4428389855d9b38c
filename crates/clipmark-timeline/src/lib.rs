//! Clipmark Timeline - Clip data model
//!
//! Implements the state behind the interval editor:
//! - Clips: named, persisted sub-ranges of a recording
//! - The range model shared by pointer interaction and the clip list
//! - The clip registry with selection, in-place edits and debounced auto-commit
//! - Versioned clip list serialization

pub mod clip;
pub mod range;
pub mod registry;
pub mod serialization;

pub use clip::{Clip, ClipId};
pub use range::{CommitKind, EditMode, RangeCommit, RangeModel};
pub use registry::{ClipRegistry, CommitOutcome, SelectionChange};
pub use serialization::ClipFile;
