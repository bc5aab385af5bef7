//! Frontend module for egui UI
//!
//! Hosts one [`EditorSession`] in an eframe window:
//!
//! - left: the operator palette ([`palette_panel`]), entries dragged onto the canvas
//! - center: the canvas ([`canvas_view`])
//! - right: the properties panel ([`properties`])
//! - top: menu bar and [`toolbar`]; bottom: [`status_bar`]
//!
//! Panels return [`AppAction`]s; [`DesignerApp::handle_action`] applies them
//! to the session. Matcher runs go through a [`MatchDispatcher`] and their
//! outcomes are drained at the start of every frame.

pub mod canvas_view;
pub mod dialogs;
pub mod file_selector;
pub mod fonts;
pub mod palette_panel;
pub mod properties;
pub mod state;
pub mod status_bar;
pub mod toolbar;

pub use file_selector::NativePathSelector;
pub use state::AppAction;
pub use status_bar::Notice;

use std::sync::Arc;

use dialogs::{
    show_dialog, ClearConfirmAction, ClearConfirmContext, ClearConfirmDialog, ClearConfirmState,
    OpenPipelineAction, OpenPipelineContext, OpenPipelineDialog, OpenPipelineState,
    RuleMatcherAction, RuleMatcherContext, RuleMatcherDialog, RuleMatcherState,
};

use crate::config::AppState;
use crate::editor::{EditorSession, MatchApplication, PropertyForm, Selection};
use crate::external::{MatchDispatcher, SatelliteRule};
use crate::palette::Palette;
use crate::record::{PipelineRecord, PipelineStore};

/// Main application state for the designer
pub struct DesignerApp {
    session: EditorSession,
    palette: Arc<Palette>,
    app_state: AppState,
    store: Option<PipelineStore>,
    dispatcher: Option<MatchDispatcher>,
    rules: Vec<SatelliteRule>,
    selector: NativePathSelector,

    // === UI buffers ===
    palette_filter: String,
    name_buffer: String,
    notice: Option<Notice>,
    records: Vec<PipelineRecord>,

    // === Dialogs ===
    clear_confirm_open: bool,
    clear_confirm_state: ClearConfirmState,
    matcher_open: bool,
    matcher_state: RuleMatcherState,
    open_dialog_open: bool,
    open_dialog_state: OpenPipelineState,
}

impl DesignerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        palette: Arc<Palette>,
        app_state: AppState,
        store: Option<PipelineStore>,
        dispatcher: Option<MatchDispatcher>,
    ) -> Self {
        if fonts::install_cjk_fallback(&cc.egui_ctx).is_none() {
            tracing::warn!("No CJK font found, Chinese labels may not render");
        }

        let settings = app_state.editor.clone();
        let restored = match (&store, &app_state.last_pipeline) {
            (Some(store), Some(id)) => match store.load(id) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Failed to restore last pipeline '{}': {}", id, e);
                    None
                }
            },
            _ => None,
        };
        let session = match restored {
            Some(record) => EditorSession::from_record(Arc::clone(&palette), settings, record),
            None => EditorSession::new(Arc::clone(&palette), settings),
        };
        let rules = dispatcher.as_ref().map(|d| d.rules()).unwrap_or_default();

        Self {
            name_buffer: session.meta().name.clone(),
            session,
            palette,
            app_state,
            store,
            dispatcher,
            rules,
            selector: NativePathSelector,
            palette_filter: String::new(),
            notice: None,
            records: Vec::new(),
            clear_confirm_open: false,
            clear_confirm_state: ClearConfirmState,
            matcher_open: false,
            matcher_state: RuleMatcherState::default(),
            open_dialog_open: false,
            open_dialog_state: OpenPipelineState::default(),
        }
    }

    /// Apply finished matcher runs. Returns true if any arrived.
    fn process_match_outcomes(&mut self) -> bool {
        let Some(dispatcher) = &self.dispatcher else {
            return false;
        };
        let mut received = false;
        while let Some(outcome) = dispatcher.try_recv() {
            received = true;
            match self.session.apply_match_outcome(outcome) {
                MatchApplication::Applied(count) => {
                    self.notice = Some(Notice::Info(format!("匹配到 {} 个影像", count)));
                }
                MatchApplication::Stale => {}
                MatchApplication::Failed(message) => {
                    self.notice = Some(Notice::Error(format!("匹配失败: {}", message)));
                }
            }
        }
        received
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::PointerDown(p) => {
                self.session.pointer_down(p);
            }
            AppAction::PointerMove(p) => self.session.pointer_move(p),
            AppAction::PointerUp(p) => {
                self.session.pointer_up(p);
            }
            AppAction::CancelGesture => self.session.cancel_gesture(),
            AppAction::DropTemplate { name, screen } => {
                if let Some(node) = self.session.drop_template(&name, screen) {
                    self.session.select(Selection::Node(node));
                }
            }
            AppAction::Undo => {
                self.session.undo();
            }
            AppAction::Redo => {
                self.session.redo();
            }
            AppAction::AutoLayout => self.session.auto_layout(),
            AppAction::ZoomIn => self.session.zoom_in(),
            AppAction::ZoomOut => self.session.zoom_out(),
            AppAction::ResetView => self.session.reset_view(),
            AppAction::RequestClear => {
                self.session.request_clear();
                self.clear_confirm_open = true;
            }
            AppAction::ConfirmClear => {
                self.session.confirm_clear();
            }
            AppAction::CancelClear => self.session.cancel_clear(),
            AppAction::NewPipeline => {
                let settings = self.app_state.editor.clone();
                self.replace_session(EditorSession::new(Arc::clone(&self.palette), settings));
            }
            AppAction::SavePipeline => self.save_pipeline(),
            AppAction::ShowOpenDialog => {
                self.refresh_records();
                self.open_dialog_open = true;
            }
            AppAction::OpenPipeline(id) => self.open_pipeline(&id),
            AppAction::DeletePipeline(id) => self.delete_pipeline(&id),
            AppAction::RenamePipeline(name) => {
                let name = name.trim().to_string();
                if !name.is_empty() {
                    self.session.meta_mut().name = name;
                }
                self.name_buffer = self.session.meta().name.clone();
            }
            AppAction::SetField { node, label, value } => {
                self.session.set_field(node, &label, value);
            }
            AppAction::BrowseField { node, label } => {
                self.session.browse_field(&self.selector, node, &label);
            }
            AppAction::AddMappingRow(conn) => {
                self.session.add_mapping_row(conn);
            }
            AppAction::RemoveMappingRow(conn, index) => {
                self.session.remove_mapping_row(conn, index);
            }
            AppAction::SetMappingRow {
                conn,
                index,
                mapping,
            } => {
                self.session.set_mapping_row(conn, index, mapping);
            }
            AppAction::SetCloudInputPath(path) => {
                self.session.set_cloud_input_path(path);
            }
            AppAction::BrowseCloudInput => {
                self.session.browse_cloud_input(&self.selector);
            }
            AppAction::ShowMatcherDialog => {
                if let PropertyForm::CloudInput(form) = self.session.property_form() {
                    self.matcher_state = RuleMatcherState::with_rules(&form.rule_ids);
                    self.matcher_open = true;
                }
            }
            AppAction::RunMatch(rule_ids) => self.run_match(rule_ids),
            AppAction::DismissNotice => self.notice = None,
        }
    }

    fn replace_session(&mut self, session: EditorSession) {
        self.session = session;
        self.name_buffer = self.session.meta().name.clone();
        self.matcher_open = false;
        self.clear_confirm_open = false;
    }

    fn run_match(&mut self, rule_ids: Vec<String>) {
        if !self.session.set_cloud_rule_ids(rule_ids) {
            return;
        }
        let Some(dispatcher) = &self.dispatcher else {
            self.notice = Some(Notice::Error("资源匹配服务不可用".to_string()));
            return;
        };
        if let Some((ticket, request)) = self.session.begin_match() {
            dispatcher.submit(ticket, request);
        }
    }

    fn save_pipeline(&mut self) {
        let Some(store) = &self.store else {
            self.notice = Some(Notice::Error("无法确定产线存储目录".to_string()));
            return;
        };
        let record = self.session.to_record();
        match store.save(&record) {
            Ok(()) => {
                self.session.mark_saved();
                self.app_state.touch_pipeline(&record.id);
                self.persist_app_state();
                self.notice = Some(Notice::Info(format!("已保存 “{}”", record.name)));
            }
            Err(e) => {
                tracing::error!("Failed to save pipeline: {}", e);
                self.notice = Some(Notice::Error(format!("保存失败: {}", e)));
            }
        }
    }

    fn open_pipeline(&mut self, id: &str) {
        let Some(store) = &self.store else {
            return;
        };
        match store.load(id) {
            Ok(record) => {
                let settings = self.app_state.editor.clone();
                self.replace_session(EditorSession::from_record(
                    Arc::clone(&self.palette),
                    settings,
                    record,
                ));
                self.app_state.touch_pipeline(id);
                self.persist_app_state();
            }
            Err(e) => {
                tracing::error!("Failed to open pipeline '{}': {}", id, e);
                self.notice = Some(Notice::Error(format!("打开失败: {}", e)));
            }
        }
    }

    fn delete_pipeline(&mut self, id: &str) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.delete(id) {
            self.notice = Some(Notice::Error(format!("删除失败: {}", e)));
            return;
        }
        self.app_state.forget_pipeline(id);
        self.persist_app_state();
        self.refresh_records();
    }

    fn refresh_records(&mut self) {
        self.records = match &self.store {
            Some(store) => store.list().unwrap_or_else(|e| {
                tracing::warn!("Failed to list pipelines: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
    }

    fn persist_app_state(&self) {
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        // Leave text fields alone
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut actions = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(Key::Z) && i.modifiers.command_only() {
                actions.push(AppAction::Undo);
            }
            if (i.key_pressed(Key::Y) && i.modifiers.command_only())
                || (i.key_pressed(Key::Z) && i.modifiers.command && i.modifiers.shift)
            {
                actions.push(AppAction::Redo);
            }
            if i.key_pressed(Key::S) && i.modifiers.command_only() {
                actions.push(AppAction::SavePipeline);
            }
            if i.key_pressed(Key::Escape) {
                actions.push(AppAction::CancelGesture);
            }
        });
        for action in actions {
            self.handle_action(action);
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let graph = self.session.graph();
        let clear_ctx = ClearConfirmContext {
            process_nodes: graph.process_nodes().count(),
            connections: graph.connections().len(),
        };
        let clear_action = show_dialog::<ClearConfirmDialog>(
            ctx,
            &mut self.clear_confirm_open,
            &mut self.clear_confirm_state,
            clear_ctx,
        );
        match clear_action {
            Some(ClearConfirmAction::Confirm) => self.handle_action(AppAction::ConfirmClear),
            Some(ClearConfirmAction::Cancel) => self.handle_action(AppAction::CancelClear),
            None => {}
        }

        let input_path = match self.session.property_form() {
            PropertyForm::CloudInput(form) => Some(form.input_path),
            _ => None,
        };
        match input_path {
            Some(input_path) => {
                let matcher_ctx = RuleMatcherContext {
                    rules: &self.rules,
                    input_path: &input_path,
                    running: self.dispatcher.as_ref().is_some_and(|d| d.in_flight() > 0),
                };
                if let Some(RuleMatcherAction::Run(rule_ids)) = show_dialog::<RuleMatcherDialog>(
                    ctx,
                    &mut self.matcher_open,
                    &mut self.matcher_state,
                    matcher_ctx,
                ) {
                    self.handle_action(AppAction::RunMatch(rule_ids));
                }
            }
            // The cloud input node is no longer selected
            None => self.matcher_open = false,
        }

        let open_ctx = OpenPipelineContext {
            records: &self.records,
            current_id: &self.session.meta().id,
        };
        if let Some(action) = show_dialog::<OpenPipelineDialog>(
            ctx,
            &mut self.open_dialog_open,
            &mut self.open_dialog_state,
            open_ctx,
        ) {
            match action {
                OpenPipelineAction::Open(id) => self.handle_action(AppAction::OpenPipeline(id)),
                OpenPipelineAction::Delete(id) => self.handle_action(AppAction::DeletePipeline(id)),
            }
        }
    }
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_outcomes = self.process_match_outcomes();
        self.handle_keyboard_shortcuts(ctx);

        let matching = self.dispatcher.as_ref().map(|d| d.in_flight()).unwrap_or(0);
        if matching > 0 || had_outcomes {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let mut actions = Vec::new();

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("文件", |ui| {
                    if ui.button("新建产线").clicked() {
                        actions.push(AppAction::NewPipeline);
                        ui.close();
                    }
                    if ui.button("打开…").clicked() {
                        actions.push(AppAction::ShowOpenDialog);
                        ui.close();
                    }
                    if ui.button("保存").clicked() {
                        actions.push(AppAction::SavePipeline);
                        ui.close();
                    }
                });
                ui.menu_button("编辑", |ui| {
                    if ui.button("撤销").clicked() {
                        actions.push(AppAction::Undo);
                        ui.close();
                    }
                    if ui.button("重做").clicked() {
                        actions.push(AppAction::Redo);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("自动布局").clicked() {
                        actions.push(AppAction::AutoLayout);
                        ui.close();
                    }
                    if ui.button("清空画布").clicked() {
                        actions.push(AppAction::RequestClear);
                        ui.close();
                    }
                });
            });
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            actions.extend(toolbar::render_toolbar(ui, &self.session, &mut self.name_buffer));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if status_bar::render_status_bar(ui, &self.session, self.notice.as_ref(), matching) {
                actions.push(AppAction::DismissNotice);
            }
        });

        egui::SidePanel::left("palette")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                palette_panel::render(&self.palette, &mut self.palette_filter, ui);
            });

        egui::SidePanel::right("properties")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    actions.extend(properties::render(&self.session.property_form(), ui));
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                actions.extend(canvas_view::render(&self.session, ui));
            });

        for action in actions {
            self.handle_action(action);
        }

        self.render_dialogs(ctx);
    }
}
