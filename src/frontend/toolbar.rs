//! Toolbar panel: pipeline name, history, layout, zoom and file actions.

use egui::{RichText, Ui};

use crate::editor::EditorSession;
use crate::frontend::state::AppAction;

/// Render the toolbar. `name_buffer` holds the pipeline name being edited.
pub fn render_toolbar(ui: &mut Ui, session: &EditorSession, name_buffer: &mut String) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        // === Pipeline group ===
        let response = ui.add(egui::TextEdit::singleline(name_buffer).desired_width(160.0));
        if response.lost_focus() && *name_buffer != session.meta().name {
            actions.push(AppAction::RenamePipeline(name_buffer.clone()));
        }
        if session.is_dirty() {
            ui.label(RichText::new("●").small()).on_hover_text("有未保存的修改");
        }
        if ui.button("新建").clicked() {
            actions.push(AppAction::NewPipeline);
        }
        if ui.button("打开…").clicked() {
            actions.push(AppAction::ShowOpenDialog);
        }
        if ui.button("保存").on_hover_text("Ctrl+S").clicked() {
            actions.push(AppAction::SavePipeline);
        }

        ui.separator();

        // === History group ===
        let history = session.history();
        if ui
            .add_enabled(history.can_undo(), egui::Button::new("↶ 撤销"))
            .on_hover_text("Ctrl+Z")
            .clicked()
        {
            actions.push(AppAction::Undo);
        }
        if ui
            .add_enabled(history.can_redo(), egui::Button::new("↷ 重做"))
            .on_hover_text("Ctrl+Y")
            .clicked()
        {
            actions.push(AppAction::Redo);
        }

        ui.separator();

        // === Canvas group ===
        if ui.button("自动布局").clicked() {
            actions.push(AppAction::AutoLayout);
        }
        if ui.button("清空画布").clicked() {
            actions.push(AppAction::RequestClear);
        }

        ui.separator();

        // === Zoom group ===
        if ui.button("−").clicked() {
            actions.push(AppAction::ZoomOut);
        }
        let zoom = session.viewport().zoom();
        if ui
            .button(format!("{:.0}%", zoom * 100.0))
            .on_hover_text("重置视图")
            .clicked()
        {
            actions.push(AppAction::ResetView);
        }
        if ui.button("+").clicked() {
            actions.push(AppAction::ZoomIn);
        }
    });

    actions
}
