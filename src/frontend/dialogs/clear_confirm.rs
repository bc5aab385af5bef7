//! Clear canvas confirmation dialog
//!
//! Shown when the user asks to clear the canvas; nothing is removed until
//! the user confirms.

use egui::{Color32, Ui};

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};

#[derive(Debug, Default)]
pub struct ClearConfirmState;

impl DialogState for ClearConfirmState {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearConfirmAction {
    Confirm,
    Cancel,
}

/// What would be removed, for the message.
pub struct ClearConfirmContext {
    pub process_nodes: usize,
    pub connections: usize,
}

pub struct ClearConfirmDialog;

impl Dialog for ClearConfirmDialog {
    type State = ClearConfirmState;
    type Action = ClearConfirmAction;
    type Context<'a> = ClearConfirmContext;

    fn title(_state: &Self::State) -> &'static str {
        "清空画布"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered_modal(320.0)
    }

    fn render(
        _state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        ui.label(format!(
            "将移除 {} 个算子节点和 {} 条连线，仅保留开始与结束节点。",
            ctx.process_nodes, ctx.connections
        ));
        ui.colored_label(Color32::GRAY, "清空后可通过撤销恢复。");
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("确定清空").clicked() {
                return DialogAction::CloseWithAction(ClearConfirmAction::Confirm);
            }
            if ui.button("取消").clicked() {
                return DialogAction::CloseWithAction(ClearConfirmAction::Cancel);
            }
            DialogAction::None
        })
        .inner
    }
}
