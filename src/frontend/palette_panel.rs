//! Palette side panel: operator categories whose entries are dragged onto
//! the canvas.

use egui::{RichText, Ui};

use crate::palette::Palette;

/// Drag-and-drop payload: the display name of the dragged template.
#[derive(Debug, Clone)]
pub struct TemplatePayload(pub String);

/// Render the palette. Drops are picked up by the canvas.
pub fn render(palette: &Palette, filter: &mut String, ui: &mut Ui) {
    ui.heading("算子库");
    ui.horizontal(|ui| {
        ui.label("🔍");
        ui.text_edit_singleline(filter);
    });
    ui.separator();

    let needle = filter.trim().to_lowercase();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for category in palette.categories() {
            let templates: Vec<_> = category
                .templates
                .iter()
                .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
                .collect();
            if templates.is_empty() {
                continue;
            }
            egui::CollapsingHeader::new(RichText::new(&category.name).strong())
                .default_open(true)
                .show(ui, |ui| {
                    for template in templates {
                        let id = egui::Id::new(("palette_template", template.key.as_str()));
                        let response = ui
                            .dnd_drag_source(id, TemplatePayload(template.name.clone()), |ui| {
                                ui.label(format!("▣ {}", template.name));
                            })
                            .response;
                        if !template.description.is_empty() {
                            response.on_hover_text(&template.description);
                        }
                    }
                });
        }
    });
}
