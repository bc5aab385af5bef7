//! Action types emitted by the UI panels
//!
//! Panels render from borrowed session state and return `AppAction`s instead
//! of mutating the session directly; [`super::DesignerApp`] applies them in
//! one place after the frame's panels are drawn.

use crate::geometry::Point;
use crate::graph::{ConnectionId, Mapping, NodeId, ParamValue};

/// Actions that any panel can emit
#[derive(Debug, Clone)]
pub enum AppAction {
    // Canvas gestures, in canvas-local screen coordinates
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    CancelGesture,
    /// A palette template was dropped on the canvas
    DropTemplate { name: String, screen: Point },

    // Toolbar
    Undo,
    Redo,
    AutoLayout,
    ZoomIn,
    ZoomOut,
    ResetView,
    RequestClear,
    ConfirmClear,
    CancelClear,
    NewPipeline,
    SavePipeline,
    ShowOpenDialog,
    OpenPipeline(String),
    DeletePipeline(String),
    RenamePipeline(String),

    // Properties panel
    SetField {
        node: NodeId,
        label: String,
        value: ParamValue,
    },
    BrowseField {
        node: NodeId,
        label: String,
    },
    AddMappingRow(ConnectionId),
    RemoveMappingRow(ConnectionId, usize),
    SetMappingRow {
        conn: ConnectionId,
        index: usize,
        mapping: Mapping,
    },
    SetCloudInputPath(String),
    BrowseCloudInput,
    ShowMatcherDialog,
    /// Run the matcher with these rules for the selected cloud input node
    RunMatch(Vec<String>),

    DismissNotice,
}
