//! Editor settings
//!
//! Tunables of the canvas editor. Every field has a default, so partial
//! settings files load cleanly.
//!
//! # Main Types
//!
//! - [`EditorSettings`] - Everything the editor session needs at construction
//! - [`ZoomSettings`] - Zoom clamp and step
//! - [`NodeGeometry`] - Node box, port and icon sizes used for hit testing

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::graph::GraphLayout;

/// Zoom clamp and step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            step: 0.1,
        }
    }
}

impl ZoomSettings {
    /// Limits safe to clamp with: non-finite or non-positive bounds fall back
    /// to the defaults, inverted bounds are swapped and a bad step is reset.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let valid = |v: f32| v.is_finite() && v > 0.0;
        let (mut min, mut max) = (self.min, self.max);
        if !valid(min) || !valid(max) {
            tracing::warn!("Invalid zoom bounds [{}, {}], using defaults", min, max);
            min = defaults.min;
            max = defaults.max;
        }
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        let step = if valid(self.step) { self.step } else { defaults.step };
        Self { min, max, step }
    }
}

/// World-space node geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGeometry {
    pub width: f32,
    pub height: f32,
    pub port_radius: f32,
    /// Palette icon size; drops are offset by half of it so the icon centers
    /// under the pointer.
    pub icon_size: f32,
}

impl NodeGeometry {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn drop_bias(&self) -> Vec2 {
        Vec2::new(self.icon_size * 0.5, self.icon_size * 0.5)
    }
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            width: 140.0,
            height: 50.0,
            port_radius: 6.0,
            icon_size: 48.0,
        }
    }
}

/// Settings handed to an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub zoom: ZoomSettings,
    pub layout: GraphLayout,
    pub node: NodeGeometry,
    /// Maximum undo depth; the oldest snapshots are dropped beyond it.
    pub history_depth: usize,
    /// Screen-space distance within which a click selects a connection.
    pub connection_hit_tolerance: f32,
    /// Segments used to sample connection curves.
    pub curve_segments: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            layout: GraphLayout::default(),
            node: NodeGeometry::default(),
            history_depth: 100,
            connection_hit_tolerance: 6.0,
            curve_segments: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "history_depth": 5, "zoom": { "max": 3.0 } }"#).unwrap();
        assert_eq!(settings.history_depth, 5);
        assert_eq!(settings.zoom.max, 3.0);
        assert_eq!(settings.zoom.min, 0.5);
        assert_eq!(settings.layout, GraphLayout::default());
    }

    #[test]
    fn test_zoom_limits_sanitized() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "zoom": { "min": 3.0, "step": -1.0 } }"#).unwrap();
        let zoom = settings.zoom.sanitized();
        assert_eq!((zoom.min, zoom.max), (2.0, 3.0));
        assert_eq!(zoom.step, 0.1);
        assert_eq!(ZoomSettings::default().sanitized(), ZoomSettings::default());
    }

    #[test]
    fn test_drop_bias_is_half_icon() {
        let geometry = NodeGeometry::default();
        assert_eq!(geometry.drop_bias(), Vec2::new(24.0, 24.0));
    }
}
