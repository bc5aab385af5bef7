//! Geoline Designer - Main Entry Point
//!
//! Visual editor for remote-sensing production lines.

use geoline_designer::{
    config::{self, AppState, LOGS_DIR},
    external::{CatalogMatcher, MatchDispatcher},
    frontend::DesignerApp,
    palette::Palette,
    record::PipelineStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging: stderr always, plus a daily file when the data dir is usable
    let (file_layer, _log_guard) = match config::ensure_app_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join(LOGS_DIR), "designer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,geoline_designer=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting Geoline Designer");

    let app_state = AppState::load_or_default();

    // Operator palette: user override if configured, builtin otherwise
    let palette = match &app_state.palette_path {
        Some(path) => match Palette::load(path) {
            Ok(palette) => {
                tracing::info!("Loaded palette from {:?}", path);
                palette
            }
            Err(e) => {
                tracing::warn!("Failed to load palette {:?}: {}, using builtin", path, e);
                Palette::builtin()
            }
        },
        None => Palette::builtin(),
    };
    let palette = Arc::new(palette);

    let store = match config::pipelines_dir().map(PipelineStore::open) {
        Some(Ok(store)) => Some(store),
        Some(Err(e)) => {
            tracing::warn!("Pipeline store unavailable: {}", e);
            None
        }
        None => {
            tracing::warn!("Could not determine pipeline store directory");
            None
        }
    };

    let dispatcher = match MatchDispatcher::new(Arc::new(CatalogMatcher::default())) {
        Ok(dispatcher) => Some(dispatcher),
        Err(e) => {
            tracing::warn!("Resource matcher unavailable: {}", e);
            None
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Geoline Designer"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Geoline Designer",
        native_options,
        Box::new(|cc| {
            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.window_shadow.offset = [0, 0];
            cc.egui_ctx.set_style(style);

            Ok(Box::new(DesignerApp::new(
                cc,
                palette,
                app_state,
                store,
                dispatcher,
            )))
        }),
    );

    tracing::info!("Shutting down...");
    result
}
