//! Editing layer on top of the graph model.
//!
//! - [`viewport`]: pan/zoom transform between screen and world space
//! - [`canvas`]: pointer state machine, hit testing and connection geometry
//! - [`history`]: snapshot-based linear undo/redo
//! - [`binder`]: selection → property form resolution
//! - [`session`]: [`EditorSession`], which owns all of the above for one pipeline

pub mod binder;
pub mod canvas;
pub mod history;
pub mod session;
pub mod viewport;

pub use binder::{
    bind, BoundField, CloudInputForm, MappingForm, NodeForm, PropertyForm, Selection,
};
pub use canvas::{CanvasController, HitTarget, Interaction, ReleaseOutcome};
pub use history::History;
pub use session::{EditorSession, MatchApplication, UNTITLED_PIPELINE};
pub use viewport::Viewport;
