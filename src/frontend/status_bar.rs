//! Status bar panel: bottom bar with graph counts, gesture state and the
//! latest notice.

use egui::{Color32, RichText, Ui};

use crate::editor::EditorSession;

/// A dismissible message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Render the status bar. Returns true when the notice was dismissed.
pub fn render_status_bar(ui: &mut Ui, session: &EditorSession, notice: Option<&Notice>, matching: usize) -> bool {
    let mut dismissed = false;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let graph = session.graph();
        ui.label(RichText::new(format!("节点: {}", graph.nodes().len())).small());
        ui.separator();
        ui.label(RichText::new(format!("连线: {}", graph.connections().len())).small());
        ui.separator();
        ui.label(RichText::new(format!("缩放: {:.0}%", session.viewport().zoom() * 100.0)).small());
        ui.separator();
        ui.label(RichText::new(session.canvas().state().name()).small().color(Color32::GRAY));

        if matching > 0 {
            ui.separator();
            ui.spinner();
            ui.label(RichText::new("匹配中").small());
        }

        if let Some(notice) = notice {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✖").clicked() {
                    dismissed = true;
                }
                match notice {
                    Notice::Info(text) => ui.label(RichText::new(text).small()),
                    Notice::Error(text) => ui.colored_label(Color32::RED, RichText::new(text).small()),
                };
            });
        }
    });
    dismissed
}
