//! Drop shadow configuration shared by every text draw in a frame.

use super::{LayerEffect, RenderContext};

/// Opacity of the black shadow color.
pub const SHADOW_OPACITY: f32 = 0.25;

/// Shadow parameters in canvas pixels.
///
/// `blur` follows canvas `shadowBlur` semantics: the Gaussian standard
/// deviation is half of it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowState {
    /// Opacity of the black shadow; zero disables the shadow.
    pub opacity: f32,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ShadowState {
    /// Shadow scaled to the canvas: blur `min / 60`, offsets `min / 120`.
    pub fn for_canvas(enabled: bool, min_side: f32) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            opacity: SHADOW_OPACITY,
            blur: min_side / 60.0,
            offset_x: min_side / 120.0,
            offset_y: min_side / 120.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn std_deviation(&self) -> f32 {
        self.blur / 2.0
    }
}

/// Configures the shadow once per draw. Paints nothing.
#[derive(Debug, Clone, Copy)]
pub struct ShadowLayer {
    pub enabled: bool,
}

impl LayerEffect for ShadowLayer {
    fn paint(&self, _ctx: &mut RenderContext) {}

    fn emit(&self, ctx: &mut RenderContext) {
        let shadow = ShadowState::for_canvas(self.enabled, ctx.geometry.min_side());
        ctx.set(shadow);
    }
}
