//! Title and subtitle layer.

use super::shadow::ShadowState;
use super::svg::{TextRun, render_svg_onto, text_document};
use super::{LayerEffect, RenderContext};
use crate::font::{FontDescriptor, FontLibrary};
use crate::layout::LayoutGeometry;
use crate::scene::{TextAlign, TextStyle};

/// Distance from the canvas edge for left- and right-aligned text.
pub const TEXT_MARGIN: f32 = 20.0;

/// Where the title and subtitle are anchored, in canvas pixels.
///
/// Vertical anchors are the vertical center of each line's em box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub title_y: f32,
    pub title_px: f32,
    /// Present only when the subtitle is visible.
    pub subtitle: Option<SubtitlePlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtitlePlacement {
    pub y: f32,
    pub px: f32,
}

impl TextPlacement {
    pub fn compute(geometry: &LayoutGeometry, style: &TextStyle, subtitle_visible: bool) -> Self {
        let width = geometry.width as f32;
        let height = geometry.height as f32;
        let min_side = geometry.min_side();

        let x = match style.align {
            TextAlign::Left => TEXT_MARGIN,
            TextAlign::Center => width / 2.0,
            TextAlign::Right => width - TEXT_MARGIN,
        };

        let title_px = min_side * style.font_size_pct / 100.0;
        if !subtitle_visible {
            return Self {
                x,
                title_y: height / 2.0,
                title_px,
                subtitle: None,
            };
        }

        let title_y = height / 2.0 - title_px / 2.0;
        let sub_px = min_side * style.sub_font_size_pct / 100.0;
        Self {
            x,
            title_y,
            title_px,
            subtitle: Some(SubtitlePlacement {
                y: title_y + title_px / 2.0 + sub_px / 2.0,
                px: sub_px,
            }),
        }
    }
}

/// Draws the title and, when visible, the subtitle.
///
/// # Consumed Properties
///
/// - [`ShadowState`]: shadow applied to both lines. Missing means no shadow.
///
/// # Emitted Properties
///
/// - [`TextPlacement`]: the anchors used for this frame.
pub struct TextLayer<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub style: &'a TextStyle,
    pub fonts: &'a FontLibrary,
}

impl TextLayer<'_> {
    fn placement(&self, geometry: &LayoutGeometry) -> TextPlacement {
        TextPlacement::compute(geometry, self.style, self.subtitle.is_some())
    }

    fn descriptor(&self, size_px: f32) -> FontDescriptor {
        FontDescriptor::new(
            self.style.italic,
            self.style.bold,
            size_px,
            self.style.font_family,
        )
    }
}

impl LayerEffect for TextLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let placement = self.placement(&ctx.geometry);
        let shadow = ctx.get::<ShadowState>().copied().unwrap_or_default();

        let mut runs = vec![TextRun {
            text: self.title,
            x: placement.x,
            y: placement.title_y,
            font: self.descriptor(placement.title_px),
        }];
        if let (Some(text), Some(sub)) = (self.subtitle, placement.subtitle) {
            runs.push(TextRun {
                text,
                x: placement.x,
                y: sub.y,
                font: self.descriptor(sub.px),
            });
        }
        if runs.iter().all(|run| run.text.is_empty()) {
            return;
        }

        let svg = text_document(
            ctx.geometry.width,
            ctx.geometry.height,
            &runs,
            self.style.color,
            self.style.align,
            &shadow,
        );
        if let Err(err) = render_svg_onto(&svg, self.fonts, &mut ctx.surface) {
            tracing::warn!(%err, "skipping text layer");
        }
    }

    fn emit(&self, ctx: &mut RenderContext) {
        let placement = self.placement(&ctx.geometry);
        ctx.set(placement);
    }
}
