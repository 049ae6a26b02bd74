//! Pan/zoom affine transform between layout (world) and screen space.
//!
//! `screen = world * scale + translate`. The transform has no notion of
//! input events; see [`gesture`](super::gesture) for the pointer adapter.

use serde::{Deserialize, Serialize};

/// Limits and fitting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Fit never zooms in beyond this scale.
    pub max_fit_factor: f32,
    /// Fraction of the viewport the fitted content may occupy.
    pub fit_margin: f32,
    /// Pointer travel (screen px) before a press becomes a drag.
    pub drag_threshold: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            max_fit_factor: 1.0,
            fit_margin: 0.9,
            drag_threshold: 5.0,
        }
    }
}

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

/// Current pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scale and center content of the given size inside the viewport.
    ///
    /// Empty content or an empty viewport leaves the transform unchanged.
    pub fn fit_to_view(
        &mut self,
        viewport_w: f32,
        viewport_h: f32,
        content_w: f32,
        content_h: f32,
        config: &ViewportConfig,
    ) {
        if content_w <= 0.0 || content_h <= 0.0 || viewport_w <= 0.0 || viewport_h <= 0.0 {
            return;
        }

        let fit = (viewport_w / content_w)
            .min(viewport_h / content_h)
            .min(config.max_fit_factor);
        let scale = (fit * config.fit_margin).clamp(config.min_scale, config.max_scale);

        self.scale = scale;
        self.translate_x = (viewport_w - content_w * scale) / 2.0;
        self.translate_y = (viewport_h - content_h * scale) / 2.0;
    }

    /// Multiply the scale by `factor`, keeping the screen point under the
    /// cursor fixed.
    pub fn zoom_at(&mut self, cursor_x: f32, cursor_y: f32, factor: f32, config: &ViewportConfig) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let old = self.scale;
        let new = (old * factor).clamp(config.min_scale, config.max_scale);
        let ratio = new / old;

        self.translate_x = cursor_x - (cursor_x - self.translate_x) * ratio;
        self.translate_y = cursor_y - (cursor_y - self.translate_y) * ratio;
        self.scale = new;
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Put a world point at the center of the viewport, keeping the scale.
    pub fn center_on(&mut self, world_x: f32, world_y: f32, viewport_w: f32, viewport_h: f32) {
        self.translate_x = viewport_w / 2.0 - world_x * self.scale;
        self.translate_y = viewport_h / 2.0 - world_y * self.scale;
    }

    pub fn world_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    pub fn screen_to_world(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }

    /// World-space rectangle currently visible in a viewport of this size.
    pub fn visible_world_rect(&self, viewport_w: f32, viewport_h: f32) -> WorldRect {
        let (min_x, min_y) = self.screen_to_world(0.0, 0.0);
        let (max_x, max_y) = self.screen_to_world(viewport_w, viewport_h);
        WorldRect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}
