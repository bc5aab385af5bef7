//! One editing session: the graph plus everything that acts on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::config::EditorSettings;
use crate::editor::binder::{self, cloud_keys, PropertyForm, Selection};
use crate::editor::canvas::{CanvasController, HitTarget, ReleaseOutcome};
use crate::editor::history::History;
use crate::editor::viewport::Viewport;
use crate::external::{BrowseRequest, MatchOutcome, MatchRequest, MatchTicket, PathSelector};
use crate::geometry::Point;
use crate::graph::{Connection, ConnectionId, Mapping, NodeId, ParamValue, PipelineGraph};
use crate::palette::{FieldType, Palette, TemplateBehavior};
use crate::record::{CanvasData, PipelineRecord};

/// Name given to pipelines created from scratch.
pub const UNTITLED_PIPELINE: &str = "未命名产线";

/// What happened to a matcher outcome handed to [`EditorSession::apply_match_outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchApplication {
    /// Stored into the node; carries the number of matched resources.
    Applied(usize),
    /// The selection changed since the request was made; nothing written.
    Stale,
    /// The matcher failed; parameters were left untouched.
    Failed(String),
}

/// Selection generations are unique across every session in the process, so
/// a ticket issued by one session never matches another.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

pub struct EditorSession {
    palette: Arc<Palette>,
    settings: EditorSettings,
    graph: PipelineGraph,
    history: History,
    canvas: CanvasController,
    selection: Selection,
    /// Renewed on every selection change; tags matcher requests.
    generation: u64,
    clear_pending: bool,
    dirty: bool,
    /// Record metadata; `canvas_data` is filled in by [`Self::to_record`].
    meta: PipelineRecord,
}

impl EditorSession {
    /// Fresh session on the two-terminal baseline.
    pub fn new(palette: Arc<Palette>, settings: EditorSettings) -> Self {
        let id = format!("pl-{}", Utc::now().format("%Y%m%d%H%M%S%3f"));
        let graph = PipelineGraph::new(settings.layout);
        Self::with_graph(palette, settings, graph, PipelineRecord::new(id, UNTITLED_PIPELINE))
    }

    /// Open a stored record. Invalid connections are pruned and id counters
    /// resume past the loaded ids; history starts empty.
    pub fn from_record(palette: Arc<Palette>, settings: EditorSettings, record: PipelineRecord) -> Self {
        let PipelineRecord { canvas_data, .. } = &record;
        let graph = PipelineGraph::from_parts(
            canvas_data.nodes.clone(),
            canvas_data.connections.clone(),
            settings.layout,
        );
        tracing::info!(
            "Opened pipeline '{}' ({} nodes, {} connections)",
            record.id,
            graph.nodes().len(),
            graph.connections().len()
        );
        let meta = PipelineRecord {
            canvas_data: CanvasData::default(),
            ..record
        };
        Self::with_graph(palette, settings, graph, meta)
    }

    fn with_graph(
        palette: Arc<Palette>,
        settings: EditorSettings,
        graph: PipelineGraph,
        meta: PipelineRecord,
    ) -> Self {
        Self {
            palette,
            history: History::new(settings.history_depth),
            canvas: CanvasController::new(settings.clone()),
            settings,
            graph,
            selection: Selection::None,
            generation: next_generation(),
            clear_pending: false,
            dirty: false,
            meta,
        }
    }

    /// Current graph as a record, with the session's metadata.
    pub fn to_record(&self) -> PipelineRecord {
        PipelineRecord {
            canvas_data: self.graph.snapshot().into(),
            ..self.meta.clone()
        }
    }

    pub fn meta(&self) -> &PipelineRecord {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut PipelineRecord {
        self.dirty = true;
        &mut self.meta
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn viewport(&self) -> &Viewport {
        self.canvas.viewport()
    }

    // ==================== Pointer gestures ====================

    /// Press on the canvas. Also updates the selection: background clears it,
    /// nodes and connections select themselves.
    pub fn pointer_down(&mut self, screen: Point) -> HitTarget {
        let hit = self.canvas.pointer_down(&self.graph, screen);
        let selection = match hit {
            HitTarget::Background => Selection::None,
            HitTarget::NodeBody(id) | HitTarget::InputPort(id) | HitTarget::OutputPort(id) => {
                Selection::Node(id)
            }
            HitTarget::Connection(id) => Selection::Connection(id),
        };
        self.select(selection);
        hit
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.canvas.pointer_move(&mut self.graph, screen);
    }

    pub fn pointer_up(&mut self, screen: Point) -> ReleaseOutcome {
        let outcome = self
            .canvas
            .pointer_up(&mut self.graph, &mut self.history, screen);
        if matches!(outcome, ReleaseOutcome::Moved(_) | ReleaseOutcome::Connected(_)) {
            self.dirty = true;
        }
        outcome
    }

    /// Abandon the current gesture. A half-finished drag keeps the
    /// position it reached, without a history entry.
    pub fn cancel_gesture(&mut self) {
        self.canvas.cancel();
    }

    /// Drop a palette template, looked up by display name, at a screen point.
    /// Unknown names are ignored.
    pub fn drop_template(&mut self, name: &str, screen: Point) -> Option<NodeId> {
        let palette = Arc::clone(&self.palette);
        let Some(template) = palette.template_by_name(name) else {
            tracing::debug!("Ignoring drop of unknown template '{}'", name);
            return None;
        };
        let position = self.canvas.drop_position(screen);
        self.history.commit(&self.graph);
        let node = self.graph.add_node(template, position);
        self.dirty = true;
        Some(node.id)
    }

    /// Connect two nodes directly, applying the same port rules as the
    /// drag gesture.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Option<Connection> {
        let ports_ok = matches!(
            (self.graph.node(from), self.graph.node(to)),
            (Some(a), Some(b)) if a.role.emits_output() && b.role.accepts_input()
        );
        if !ports_ok || !self.graph.can_connect(from, to) {
            tracing::debug!("Connection {:?} -> {:?} rejected", from, to);
            return None;
        }
        self.history.commit(&self.graph);
        let conn = self.graph.add_connection(from, to)?;
        self.dirty = true;
        Some(conn)
    }

    // ==================== Canvas-wide actions ====================

    /// Ask to clear the canvas. Nothing changes until [`Self::confirm_clear`].
    pub fn request_clear(&mut self) {
        self.canvas.cancel();
        self.clear_pending = true;
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_pending
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    /// Carry out a requested clear. Returns false if none was requested.
    pub fn confirm_clear(&mut self) -> bool {
        if !std::mem::take(&mut self.clear_pending) {
            return false;
        }
        self.history.commit(&self.graph);
        self.graph.remove_all_except_terminals();
        self.select(Selection::None);
        self.dirty = true;
        true
    }

    pub fn auto_layout(&mut self) {
        self.history.commit(&self.graph);
        self.graph.auto_layout();
        self.dirty = true;
    }

    pub fn undo(&mut self) -> bool {
        self.canvas.cancel();
        let undone = self.history.undo(&mut self.graph);
        if undone {
            self.select(Selection::None);
            self.dirty = true;
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.canvas.cancel();
        let redone = self.history.redo(&mut self.graph);
        if redone {
            self.select(Selection::None);
            self.dirty = true;
        }
        redone
    }

    pub fn zoom_in(&mut self) {
        self.canvas.viewport_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.canvas.viewport_mut().zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.canvas.viewport_mut().reset();
    }

    // ==================== Selection & properties ====================

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Current selection generation, as carried by [`MatchTicket`]s.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn select(&mut self, selection: Selection) {
        if self.selection != selection {
            self.selection = selection;
            self.generation = next_generation();
            tracing::trace!("Selection -> {:?} (gen {})", selection, self.generation);
        }
    }

    pub fn property_form(&self) -> PropertyForm {
        binder::bind(&self.graph, &self.palette, self.selection)
    }

    /// Panel edit of one parameter. Not recorded in history.
    pub fn set_field(&mut self, node: NodeId, label: &str, value: impl Into<ParamValue>) -> bool {
        let updated = self.graph.update_node_param(node, label, value.into());
        self.dirty |= updated;
        updated
    }

    /// Open the path selector for a `file` field and store the answer.
    pub fn browse_field(&mut self, selector: &dyn PathSelector, node: NodeId, label: &str) -> bool {
        let field_type = self
            .graph
            .node(node)
            .and_then(|n| self.palette.template(&n.kind.template))
            .and_then(|t| t.field(label))
            .map(|f| f.field_type);
        if field_type != Some(FieldType::File) {
            return false;
        }
        match selector.browse(&BrowseRequest::file(label)) {
            Some(selected) => self.set_field(node, label, selected.to_param_text()),
            None => false,
        }
    }

    pub fn add_mapping_row(&mut self, conn: ConnectionId) -> bool {
        let changed = binder::add_mapping_row(&mut self.graph, conn);
        self.mark_dirty_if(changed)
    }

    pub fn remove_mapping_row(&mut self, conn: ConnectionId, index: usize) -> bool {
        let changed = binder::remove_mapping_row(&mut self.graph, conn, index);
        self.mark_dirty_if(changed)
    }

    pub fn set_mapping_row(&mut self, conn: ConnectionId, index: usize, mapping: Mapping) -> bool {
        let changed = binder::set_mapping_row(&mut self.graph, conn, index, mapping);
        self.mark_dirty_if(changed)
    }

    fn mark_dirty_if(&mut self, changed: bool) -> bool {
        self.dirty |= changed;
        changed
    }

    // ==================== Cloud data input ====================

    /// The selected node, if it is a cloud data input node.
    fn selected_cloud_input(&self) -> Option<NodeId> {
        let id = self.selection.node()?;
        let node = self.graph.node(id)?;
        let template = self.palette.template(&node.kind.template)?;
        (template.behavior == TemplateBehavior::CloudInput).then_some(id)
    }

    pub fn set_cloud_input_path(&mut self, path: impl Into<String>) -> bool {
        match self.selected_cloud_input() {
            Some(node) => self.set_field(node, cloud_keys::INPUT_PATH, path.into()),
            None => false,
        }
    }

    /// Pick the cloud input directory through `selector`.
    pub fn browse_cloud_input(&mut self, selector: &dyn PathSelector) -> bool {
        if self.selected_cloud_input().is_none() {
            return false;
        }
        match selector.browse(&BrowseRequest::directory("选择云盘数据目录")) {
            Some(selected) => self.set_cloud_input_path(selected.to_param_text()),
            None => false,
        }
    }

    pub fn set_cloud_rule_ids(&mut self, rule_ids: Vec<String>) -> bool {
        match self.selected_cloud_input() {
            Some(node) => self.set_field(node, cloud_keys::RULE_IDS, ParamValue::List(rule_ids)),
            None => false,
        }
    }

    /// Build a matcher request for the selected cloud input node, tagged with
    /// the current selection generation.
    pub fn begin_match(&self) -> Option<(MatchTicket, MatchRequest)> {
        let node = self.selected_cloud_input()?;
        let PropertyForm::CloudInput(form) = self.property_form() else {
            return None;
        };
        let ticket = MatchTicket {
            node,
            generation: self.generation,
        };
        let request = MatchRequest {
            input_path: form.input_path,
            rule_ids: form.rule_ids,
        };
        Some((ticket, request))
    }

    /// Store a matcher outcome, unless the selection moved on since the
    /// request was made.
    pub fn apply_match_outcome(&mut self, outcome: MatchOutcome) -> MatchApplication {
        let MatchOutcome {
            ticket,
            request,
            result,
        } = outcome;
        let current = self.selected_cloud_input();
        if ticket.generation != self.generation || current != Some(ticket.node) {
            tracing::debug!(
                "Discarding stale match outcome {:?} (gen {}, selection {:?})",
                ticket,
                self.generation,
                self.selection
            );
            return MatchApplication::Stale;
        }
        match result {
            Ok(files) => {
                let count = files.len();
                self.set_field(
                    ticket.node,
                    cloud_keys::MATCHED_FILES,
                    binder::matched_files_value(&files),
                );
                self.set_field(ticket.node, cloud_keys::RULE_IDS, ParamValue::List(request.rule_ids));
                tracing::info!("Applied {} matched resources to {:?}", count, ticket.node);
                MatchApplication::Applied(count)
            }
            Err(e) => {
                tracing::warn!("Resource matching failed for {:?}: {}", ticket.node, e);
                MatchApplication::Failed(e.to_string())
            }
        }
    }
}
