//! # Geoline Designer: remote-sensing production-line editor
//!
//! A visual editor for remote-sensing processing pipelines. Operators from a
//! categorized palette are dropped onto a zoomable canvas, wired from a fixed
//! Start terminal to a fixed End terminal, and configured through a
//! schema-driven properties panel.
//!
//! ## Architecture
//!
//! - **Graph**: nodes, connections and parameter values ([`graph`])
//! - **Palette**: operator templates and their parameter schemas ([`palette`])
//! - **Editor**: viewport, canvas gestures, undo/redo and the properties
//!   binder, tied together by [`EditorSession`] ([`editor`])
//! - **External**: path selection and satellite resource matching; matcher
//!   runs happen on a tokio runtime and report back over crossbeam channels
//!   ([`external`])
//! - **Records**: saved production lines as JSON files ([`record`])
//! - **Frontend**: the eframe/egui window ([`frontend`])
//!
//! ## Configuration
//!
//! Application state (editor settings, recent pipelines) and the record store
//! live in the platform data directory under `dev.geoline.designer`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use geoline_designer::{config::EditorSettings, geometry::Point, EditorSession, Palette};
//!
//! let mut session = EditorSession::new(Arc::new(Palette::builtin()), EditorSettings::default());
//! let node = session.drop_template("数据采集", Point::new(424.0, 324.0)).unwrap();
//! assert_eq!(session.graph().node(node).unwrap().name, "数据采集");
//! assert!(session.undo());
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod external;
pub mod frontend;
pub mod geometry;
pub mod graph;
pub mod palette;
pub mod record;

// Re-export commonly used types
pub use config::{AppState, EditorSettings};
pub use editor::{EditorSession, History, PropertyForm, Selection};
pub use error::{DesignerError, Result};
pub use frontend::DesignerApp;
pub use graph::{Connection, ConnectionId, Node, NodeId, PipelineGraph};
pub use palette::{Palette, Template};
pub use record::{PipelineRecord, PipelineStore};
