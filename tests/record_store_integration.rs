//! Saving, reopening and managing production-line records

mod common;

use std::sync::Arc;

use common::builders::SessionBuilder;
use geoline_designer::{
    config::{AppState, EditorSettings},
    geometry::Point,
    graph::{Mapping, NodeId},
    palette::Palette,
    record::PipelineStatus,
    DesignerError, EditorSession, PipelineStore,
};

#[test]
fn test_saved_pipeline_reopens_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = PipelineStore::open(dir.path().join("pipelines")).unwrap();

    let (mut session, ids) = SessionBuilder::new()
        .drop_at("数据采集", Point::new(300.0, 300.0))
        .drop_at("波段合成", Point::new(550.0, 300.0))
        .build();
    let start = session.graph().start_node().unwrap().id;
    session.connect(start, ids[0]).unwrap();
    let conn = session.connect(ids[0], ids[1]).unwrap().id;
    session.add_mapping_row(conn);
    session.set_mapping_row(conn, 0, Mapping::new("原始遥感影像", "输入影像"));
    session.set_field(ids[1], "波段组合", "4,3,2");
    session.meta_mut().name = "广东影像预处理".to_string();
    assert!(session.is_dirty());

    let record = session.to_record();
    store.save(&record).unwrap();
    session.mark_saved();
    assert!(!session.is_dirty());

    let loaded = store.load(&record.id).unwrap();
    assert_eq!(loaded, record);

    let mut reopened =
        EditorSession::from_record(Arc::new(Palette::builtin()), EditorSettings::default(), loaded);
    assert_eq!(reopened.graph().snapshot(), session.graph().snapshot());
    assert_eq!(reopened.meta().name, "广东影像预处理");
    assert!(!reopened.history().can_undo());

    // New ids never collide with loaded ones
    let fresh = reopened
        .drop_template("AI解译", Point::new(100.0, 100.0))
        .unwrap();
    assert!(session.graph().node(fresh).is_none());
}

#[test]
fn test_record_json_uses_wire_names() {
    let (session, _) = SessionBuilder::new()
        .drop_at("影像裁剪", Point::new(400.0, 300.0))
        .build();
    let json = serde_json::to_value(session.to_record()).unwrap();

    for key in ["id", "name", "code", "version", "type", "status", "createTime", "canvasData"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["status"], "draft");
    assert_eq!(json["canvasData"]["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn test_list_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = PipelineStore::open(dir.path()).unwrap();

    let palette = Arc::new(Palette::builtin());
    let mut first = EditorSession::new(Arc::clone(&palette), EditorSettings::default());
    first.meta_mut().status = PipelineStatus::Published;
    let mut record = first.to_record();
    record.id = "pl-first".to_string();
    store.save(&record).unwrap();
    record.id = "pl-second".to_string();
    record.create_time += chrono::Duration::minutes(5);
    store.save(&record).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["pl-second".to_string(), "pl-first".to_string()]);

    store.delete("pl-first").unwrap();
    assert!(matches!(store.load("pl-first"), Err(DesignerError::RecordNotFound(_))));
    assert!(matches!(store.delete("pl-first"), Err(DesignerError::RecordNotFound(_))));
    assert!(matches!(store.load("../escape"), Err(DesignerError::Storage(_))));
}

#[test]
fn test_loading_repairs_bad_connections() {
    let (mut session, ids) = SessionBuilder::new()
        .drop_at("辐射定标", Point::new(400.0, 300.0))
        .build();
    let start = session.graph().start_node().unwrap().id;
    let good = session.connect(start, ids[0]).unwrap();
    let mut record = session.to_record();

    // Endpoint that was never saved, plus a self-loop
    let mut dangling = good.clone();
    dangling.to = NodeId(9999);
    let mut self_loop = good.clone();
    self_loop.to = self_loop.from;
    record.canvas_data.connections.extend([dangling, self_loop, good.clone()]);

    let reopened =
        EditorSession::from_record(Arc::new(Palette::builtin()), EditorSettings::default(), record);
    assert_eq!(reopened.graph().connections(), &[good][..]);
}

#[test]
fn test_app_state_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app_state.json");

    let mut state = AppState::default();
    state.editor.history_depth = 25;
    state.touch_pipeline("pl-a");
    state.touch_pipeline("pl-b");
    state.save_to(&path).unwrap();

    let loaded = AppState::load_from(&path).unwrap();
    assert_eq!(loaded.recent_pipelines, vec!["pl-b".to_string(), "pl-a".to_string()]);
    assert_eq!(loaded.last_pipeline.as_deref(), Some("pl-b"));
    assert_eq!(loaded.editor.history_depth, 25);

    // Missing file falls back to defaults, garbage is an error
    assert!(AppState::load_from(&dir.path().join("missing.json")).is_ok());
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(AppState::load_from(&path), Err(DesignerError::Config(_))));
}

#[test]
fn test_settings_history_depth_bounds_undo() {
    let (mut session, _) = SessionBuilder::new().history_depth(3).build();
    for i in 0..6 {
        let screen = common::builders::screen_for_world(&session, Point::new(i as f32 * 50.0, 0.0));
        session.drop_template("服务发布", screen).unwrap();
    }
    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(session.graph().process_nodes().count(), 3);
}
