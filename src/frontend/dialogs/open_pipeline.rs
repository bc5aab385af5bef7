//! Open pipeline dialog: lists stored records.

use egui::{Color32, RichText, Ui};

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::record::PipelineRecord;

#[derive(Debug, Default)]
pub struct OpenPipelineState {
    /// Record awaiting a second click to confirm deletion
    pub confirm_delete: Option<String>,
}

impl DialogState for OpenPipelineState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPipelineAction {
    Open(String),
    Delete(String),
}

pub struct OpenPipelineContext<'a> {
    pub records: &'a [PipelineRecord],
    pub current_id: &'a str,
}

pub struct OpenPipelineDialog;

impl Dialog for OpenPipelineDialog {
    type State = OpenPipelineState;
    type Action = OpenPipelineAction;
    type Context<'a> = OpenPipelineContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "打开产线"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(520.0, 400.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        if ctx.records.is_empty() {
            ui.label(RichText::new("还没有保存的产线").color(Color32::GRAY));
        }

        let mut result = DialogAction::None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("open_pipeline_records")
                .striped(true)
                .num_columns(5)
                .show(ui, |ui| {
                    for record in ctx.records {
                        let label = if record.id == ctx.current_id {
                            RichText::new(&record.name).strong()
                        } else {
                            RichText::new(&record.name)
                        };
                        ui.label(label);
                        ui.label(RichText::new(&record.code).small());
                        ui.label(record.status.display_name());
                        ui.label(
                            RichText::new(record.create_time.format("%Y-%m-%d %H:%M").to_string())
                                .small(),
                        );
                        ui.horizontal(|ui| {
                            if ui.button("打开").clicked() {
                                result = DialogAction::CloseWithAction(OpenPipelineAction::Open(
                                    record.id.clone(),
                                ));
                            }
                            let confirming = state.confirm_delete.as_deref() == Some(record.id.as_str());
                            let delete_label = if confirming { "确认删除" } else { "删除" };
                            if ui.button(delete_label).clicked() {
                                if confirming {
                                    state.confirm_delete = None;
                                    result = DialogAction::Action(OpenPipelineAction::Delete(
                                        record.id.clone(),
                                    ));
                                } else {
                                    state.confirm_delete = Some(record.id.clone());
                                }
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        ui.separator();
        if ui.button("关闭").clicked() {
            return DialogAction::Close;
        }
        result
    }
}
