//! Pan/zoom transform between screen space and world (graph) space.
//!
//! Screen coordinates are relative to the canvas origin. The transform is
//! `world = (screen - pan) / zoom`, used identically for drops, drags and
//! connection endpoints.

use crate::config::ZoomSettings;
use crate::geometry::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pan: Vec2,
    zoom: f32,
    limits: ZoomSettings,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomSettings::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomSettings) -> Self {
        let limits = limits.sanitized();
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0_f32.clamp(limits.min, limits.max),
            limits,
        }
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Convert a screen-space displacement to world space.
    pub fn screen_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta * (1.0 / self.zoom)
    }

    /// Pan is unconstrained.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    pub fn zoom_in(&mut self) {
        self.step_zoom(1);
    }

    pub fn zoom_out(&mut self) {
        self.step_zoom(-1);
    }

    /// Zoom moves on a fixed grid of `step` multiples, so repeated in/out
    /// cycles do not accumulate float drift.
    fn step_zoom(&mut self, steps: i32) {
        let step = self.limits.step;
        if step <= 0.0 {
            return;
        }
        let level = (self.zoom / step).round() as i32 + steps;
        self.zoom = (level as f32 * step).clamp(self.limits.min, self.limits.max);
        tracing::trace!("Zoom now {:.2}", self.zoom);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.limits.min, self.limits.max);
        }
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0_f32.clamp(self.limits.min, self.limits.max);
    }
}
