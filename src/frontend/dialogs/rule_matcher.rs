//! Satellite configuration matcher dialog
//!
//! Lets the user pick matching rules for the selected cloud data input node
//! and start a matching run. The run itself happens on the match dispatcher;
//! this dialog only shows whether one is in flight.

use std::collections::BTreeSet;

use egui::{Color32, RichText, Ui};

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::external::SatelliteRule;

#[derive(Debug, Default)]
pub struct RuleMatcherState {
    pub selected: BTreeSet<String>,
}

impl DialogState for RuleMatcherState {}

impl RuleMatcherState {
    /// Start from the rules already stored on the node.
    pub fn with_rules(rule_ids: &[String]) -> Self {
        Self {
            selected: rule_ids.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatcherAction {
    Run(Vec<String>),
}

pub struct RuleMatcherContext<'a> {
    pub rules: &'a [SatelliteRule],
    pub input_path: &'a str,
    pub running: bool,
}

pub struct RuleMatcherDialog;

impl Dialog for RuleMatcherDialog {
    type State = RuleMatcherState;
    type Action = RuleMatcherAction;
    type Context<'a> = RuleMatcherContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "卫星配置匹配"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(460.0, 360.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        if ctx.input_path.trim().is_empty() {
            ui.colored_label(Color32::LIGHT_RED, "请先设置输入路径");
        } else {
            ui.label(RichText::new(format!("输入路径: {}", ctx.input_path)).small());
        }
        ui.separator();

        egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
            egui::Grid::new("rule_matcher_rules")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    for rule in ctx.rules {
                        let mut checked = state.selected.contains(&rule.id);
                        if ui.checkbox(&mut checked, &rule.name).changed() {
                            if checked {
                                state.selected.insert(rule.id.clone());
                            } else {
                                state.selected.remove(&rule.id);
                            }
                        }
                        ui.label(&rule.sensor);
                        ui.label(&rule.code);
                        ui.label(&rule.resolution);
                        ui.end_row();
                    }
                });
        });
        ui.separator();

        let can_run = !ctx.running && !state.selected.is_empty() && !ctx.input_path.trim().is_empty();
        ui.horizontal(|ui| {
            if ui.add_enabled(can_run, egui::Button::new("开始匹配")).clicked() {
                let rules = state.selected.iter().cloned().collect();
                return DialogAction::Action(RuleMatcherAction::Run(rules));
            }
            if ctx.running {
                ui.spinner();
                ui.label("匹配中…");
            }
            if ui.button("关闭").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
