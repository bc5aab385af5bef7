//! Canvas pane: paints the pipeline graph and turns egui input into
//! canvas gestures.
//!
//! All hit testing and graph mutation happens in
//! [`crate::editor::CanvasController`]; this module only converts between
//! egui's absolute positions and canvas-local screen points and paints what
//! the controller reports.

use egui::{Color32, Pos2, Stroke, Ui};

use crate::editor::{EditorSession, Selection};
use crate::frontend::palette_panel::TemplatePayload;
use crate::frontend::state::AppAction;
use crate::geometry::Point;
use crate::graph::{Node, NodeRole};

const BACKGROUND: Color32 = Color32::from_gray(30);
const GRID: Color32 = Color32::from_gray(42);
const GRID_SPACING: f32 = 40.0;

/// Render the canvas filling the remaining space.
pub fn render(session: &EditorSession, ui: &mut Ui) -> Vec<AppAction> {
    let mut actions = Vec::new();

    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
    let canvas_rect = response.rect;
    let origin = canvas_rect.min;
    let to_local = |pos: Pos2| Point::new(pos.x - origin.x, pos.y - origin.y);
    let to_egui = |p: Point| Pos2::new(p.x + origin.x, p.y + origin.y);

    painter.rect_filled(canvas_rect, 0.0, BACKGROUND);
    paint_grid(&painter, canvas_rect, session);

    // === Input ===
    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(press) = ui.input(|i| i.pointer.press_origin()) {
            actions.push(AppAction::PointerDown(to_local(press)));
        }
    }
    if response.dragged_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            actions.push(AppAction::PointerMove(to_local(pos)));
        }
    }
    if response.drag_stopped() {
        if let Some(pos) = ui.input(|i| i.pointer.latest_pos()) {
            actions.push(AppAction::PointerUp(to_local(pos)));
        }
    } else if response.clicked() {
        // Click without drag: press and release in place, which selects
        if let Some(pos) = response.interact_pointer_pos() {
            actions.push(AppAction::PointerDown(to_local(pos)));
            actions.push(AppAction::PointerUp(to_local(pos)));
        }
    }

    // One zoom step per wheel event
    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll > 1.0 {
            actions.push(AppAction::ZoomIn);
        } else if scroll < -1.0 {
            actions.push(AppAction::ZoomOut);
        }
    }

    if let Some(payload) = response.dnd_release_payload::<TemplatePayload>() {
        if let Some(pos) = response.hover_pos() {
            actions.push(AppAction::DropTemplate {
                name: payload.0.clone(),
                screen: to_local(pos),
            });
        }
    }

    // === Connections (behind nodes) ===
    let graph = session.graph();
    let canvas = session.canvas();
    let zoom = session.viewport().zoom();
    let selected = session.selection();

    for conn in graph.connections() {
        let Some(curve) = canvas.connection_curve(graph, conn) else {
            continue;
        };
        let points: Vec<Pos2> = curve
            .sample(session.settings().curve_segments)
            .into_iter()
            .map(to_egui)
            .collect();
        let color = if selected == Selection::Connection(conn.id) {
            Color32::from_rgb(250, 200, 80)
        } else {
            Color32::from_gray(150)
        };
        painter.add(egui::Shape::line(points, Stroke::new(2.0 * zoom, color)));
        if let Some(&end) = curve.sample(1).last() {
            paint_arrow_head(&painter, to_egui(end), zoom, color);
        }
    }

    for (from, to) in canvas.pending_connection_dashes(graph) {
        painter.line_segment(
            [to_egui(from), to_egui(to)],
            Stroke::new(2.0 * zoom, Color32::YELLOW),
        );
    }

    // === Nodes ===
    let port_radius = session.settings().node.port_radius * zoom;
    let hover = response.hover_pos();
    for node in graph.nodes() {
        let r = canvas.node_screen_rect(node);
        let node_rect = egui::Rect::from_min_max(to_egui(r.min), to_egui(r.max));
        let is_selected = selected == Selection::Node(node.id);
        let (stroke_width, stroke_color) = if is_selected {
            (3.0, Color32::WHITE)
        } else {
            (1.0, Color32::from_gray(80))
        };

        painter.rect_filled(node_rect, 6.0 * zoom, node_color(node));
        painter.rect_stroke(
            node_rect,
            6.0 * zoom,
            Stroke::new(stroke_width * zoom, stroke_color),
            egui::StrokeKind::Outside,
        );
        painter.text(
            node_rect.center(),
            egui::Align2::CENTER_CENTER,
            &node.name,
            egui::FontId::proportional(13.0 * zoom),
            Color32::WHITE,
        );

        if node.role.accepts_input() {
            let pos = to_egui(canvas.input_anchor(node));
            let hot = hover.is_some_and(|p| (p - pos).length() < port_radius * 2.0);
            painter.circle_filled(
                pos,
                port_radius,
                if hot { Color32::LIGHT_GREEN } else { Color32::from_gray(200) },
            );
        }
        if node.role.emits_output() {
            let pos = to_egui(canvas.output_anchor(node));
            let hot = hover.is_some_and(|p| (p - pos).length() < port_radius * 2.0);
            painter.circle_filled(
                pos,
                port_radius,
                if hot { Color32::LIGHT_BLUE } else { Color32::from_gray(200) },
            );
        }
    }

    // Drop preview while a template is dragged over the canvas
    if let (Some(payload), Some(pos)) = (
        response.dnd_hover_payload::<TemplatePayload>(),
        response.hover_pos(),
    ) {
        let rect = canvas.drop_preview_rect(to_local(pos));
        let preview = egui::Rect::from_min_max(to_egui(rect.min), to_egui(rect.max));
        painter.rect_stroke(
            preview,
            6.0 * zoom,
            Stroke::new(1.0, Color32::from_gray(180)),
            egui::StrokeKind::Outside,
        );
        painter.text(
            preview.center(),
            egui::Align2::CENTER_CENTER,
            &payload.0,
            egui::FontId::proportional(12.0 * zoom),
            Color32::from_gray(180),
        );
    }

    actions
}

fn paint_grid(painter: &egui::Painter, rect: egui::Rect, session: &EditorSession) {
    let viewport = session.viewport();
    let spacing = GRID_SPACING * viewport.zoom();
    if spacing < 8.0 {
        return;
    }
    let pan = viewport.pan();
    let stroke = Stroke::new(1.0, GRID);
    let mut x = rect.left() + pan.x.rem_euclid(spacing);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += spacing;
    }
    let mut y = rect.top() + pan.y.rem_euclid(spacing);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += spacing;
    }
}

fn paint_arrow_head(painter: &egui::Painter, tip: Pos2, zoom: f32, color: Color32) {
    let size = 7.0 * zoom;
    painter.add(egui::Shape::convex_polygon(
        vec![
            tip,
            Pos2::new(tip.x - size, tip.y - size * 0.6),
            Pos2::new(tip.x - size, tip.y + size * 0.6),
        ],
        color,
        Stroke::NONE,
    ));
}

/// Fill color by role.
fn node_color(node: &Node) -> Color32 {
    match node.role {
        NodeRole::Start => Color32::from_rgb(60, 140, 60),
        NodeRole::End => Color32::from_rgb(200, 120, 40),
        NodeRole::Process => Color32::from_rgb(60, 100, 180),
    }
}
