//! System CJK font discovery
//!
//! egui's bundled fonts carry no Chinese glyphs, so the first CJK font found
//! on the system is appended as a fallback to both font families.

use std::path::Path;
use std::sync::Arc;

use egui::{FontData, FontDefinitions, FontFamily};

const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

const CJK_FONT_NAME: &str = "cjk-fallback";

/// Install the first available CJK font. Returns the path that was used.
pub fn install_cjk_fallback(ctx: &egui::Context) -> Option<&'static str> {
    let (path, bytes) = CJK_FONT_CANDIDATES
        .iter()
        .filter(|p| Path::new(p).is_file())
        .find_map(|p| std::fs::read(p).ok().map(|bytes| (*p, bytes)))?;

    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert(
        CJK_FONT_NAME.to_owned(),
        Arc::new(FontData::from_owned(bytes)),
    );
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    tracing::info!("Using CJK font {}", path);
    Some(path)
}
