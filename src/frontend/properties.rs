//! Properties panel: renders the [`PropertyForm`] for the current selection.

use egui::{Color32, RichText, Ui};

use crate::editor::{BoundField, CloudInputForm, MappingForm, NodeForm, PropertyForm};
use crate::frontend::state::AppAction;
use crate::graph::{NodeId, ParamValue};
use crate::palette::FieldType;

/// Render the panel for `form`.
pub fn render(form: &PropertyForm, ui: &mut Ui) -> Vec<AppAction> {
    let mut actions = Vec::new();
    ui.heading("属性");
    ui.separator();

    match form {
        PropertyForm::Nothing => {
            ui.label(RichText::new("选择节点或连线以编辑属性").color(Color32::GRAY));
        }
        PropertyForm::Empty { title, .. } => {
            ui.strong(title);
            ui.label(RichText::new("该节点没有可配置的参数").color(Color32::GRAY));
        }
        PropertyForm::Node(form) => render_node_form(form, ui, &mut actions),
        PropertyForm::CloudInput(form) => render_cloud_input(form, ui, &mut actions),
        PropertyForm::Mapping(form) => render_mapping_form(form, ui, &mut actions),
    }

    actions
}

fn render_node_form(form: &NodeForm, ui: &mut Ui, actions: &mut Vec<AppAction>) {
    ui.strong(&form.title);
    ui.add_space(4.0);
    egui::Grid::new(("node_form", form.node))
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            for field in &form.fields {
                let label = if field.required {
                    RichText::new(format!("{} *", field.label))
                } else {
                    RichText::new(&field.label)
                };
                let response = ui.label(label);
                if let Some(description) = &field.description {
                    response.on_hover_text(description);
                }
                render_field(form.node, field, ui, actions);
                ui.end_row();
            }
        });
}

fn render_field(node: NodeId, field: &BoundField, ui: &mut Ui, actions: &mut Vec<AppAction>) {
    let mut set = |value: String| {
        actions.push(AppAction::SetField {
            node,
            label: field.label.clone(),
            value: ParamValue::Text(value),
        })
    };

    match field.field_type {
        FieldType::Text => {
            let mut value = field.value.clone();
            if ui.text_edit_singleline(&mut value).changed() {
                set(value);
            }
        }
        FieldType::Date => {
            let mut value = field.value.clone();
            let edit = egui::TextEdit::singleline(&mut value).hint_text("YYYY-MM-DD");
            if ui.add(edit).changed() {
                set(value);
            }
        }
        FieldType::Select => {
            let mut chosen = None;
            egui::ComboBox::from_id_salt(("select", node, &field.label))
                .selected_text(&field.value)
                .show_ui(ui, |ui| {
                    for option in &field.options {
                        if ui.selectable_label(*option == field.value, option).clicked() {
                            chosen = Some(option.clone());
                        }
                    }
                });
            if let Some(option) = chosen {
                set(option);
            }
        }
        FieldType::Range => {
            let bounds = field.range.unwrap_or(crate::palette::RangeBounds {
                min: 0.0,
                max: 100.0,
                step: 1.0,
            });
            let mut value: f64 = field.value.trim().parse().unwrap_or(bounds.min);
            let slider = egui::Slider::new(&mut value, bounds.min..=bounds.max).step_by(bounds.step);
            if ui.add(slider).changed() {
                set(value.to_string());
            }
        }
        FieldType::File => {
            let mut value = field.value.clone();
            let mut browse = false;
            ui.horizontal(|ui| {
                if ui.text_edit_singleline(&mut value).changed() {
                    set(value.clone());
                }
                browse = ui.button("浏览…").clicked();
            });
            if browse {
                actions.push(AppAction::BrowseField {
                    node,
                    label: field.label.clone(),
                });
            }
        }
    }
}

fn render_cloud_input(form: &CloudInputForm, ui: &mut Ui, actions: &mut Vec<AppAction>) {
    ui.strong(&form.title);
    ui.add_space(4.0);

    ui.label("输入路径");
    ui.horizontal(|ui| {
        let mut path = form.input_path.clone();
        if ui.text_edit_singleline(&mut path).changed() {
            actions.push(AppAction::SetCloudInputPath(path));
        }
        if ui.button("选择目录").clicked() {
            actions.push(AppAction::BrowseCloudInput);
        }
    });
    ui.add_space(4.0);
    if ui.button("匹配卫星配置…").clicked() {
        actions.push(AppAction::ShowMatcherDialog);
    }

    if !form.rule_ids.is_empty() {
        ui.label(RichText::new(format!("规则: {}", form.rule_ids.join(", "))).small());
    }

    ui.separator();
    ui.label(format!("匹配结果 ({})", form.matched_files.len()));
    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        egui::Grid::new(("matched_files", form.node))
            .striped(true)
            .num_columns(4)
            .show(ui, |ui| {
                for file in &form.matched_files {
                    ui.label(&file.name);
                    ui.label(&file.satellite_type);
                    ui.label(&file.sensor);
                    ui.label(&file.resolution);
                    ui.end_row();
                }
            });
    });
}

fn render_mapping_form(form: &MappingForm, ui: &mut Ui, actions: &mut Vec<AppAction>) {
    ui.strong(format!("{} → {}", form.source_name, form.target_name));
    ui.add_space(4.0);

    egui::Grid::new(("mappings", form.connection))
        .num_columns(3)
        .spacing([6.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("上游输出").small());
            ui.label(RichText::new("下游参数").small());
            ui.end_row();

            for (index, row) in form.rows.iter().enumerate() {
                let mut edited = row.clone();
                let mut changed = false;
                changed |= mapping_combo(
                    ui,
                    ("src", form.connection, index),
                    &mut edited.source_param,
                    &form.source_outputs,
                );
                changed |= mapping_combo(
                    ui,
                    ("dst", form.connection, index),
                    &mut edited.target_param,
                    &form.target_inputs,
                );
                if changed {
                    actions.push(AppAction::SetMappingRow {
                        conn: form.connection,
                        index,
                        mapping: edited,
                    });
                }
                if ui.small_button("✖").clicked() {
                    actions.push(AppAction::RemoveMappingRow(form.connection, index));
                }
                ui.end_row();
            }
        });

    if ui.button("+ 添加映射").clicked() {
        actions.push(AppAction::AddMappingRow(form.connection));
    }
    if form.rows.is_empty() {
        ui.label(RichText::new("暂无参数映射").color(Color32::GRAY).small());
    }
}

fn mapping_combo(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    value: &mut String,
    candidates: &[String],
) -> bool {
    let mut changed = false;
    let shown = if value.is_empty() { "—" } else { value.as_str() };
    egui::ComboBox::from_id_salt(id)
        .selected_text(shown.to_string())
        .show_ui(ui, |ui| {
            for candidate in candidates {
                if ui.selectable_label(*value == *candidate, candidate).clicked() {
                    *value = candidate.clone();
                    changed = true;
                }
            }
        });
    changed
}
