//! Background layer: gradient, solid fill or stretched photo.

use image::imageops::{self, FilterType};
use resvg::tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, PixmapPaint, Point, Rect, Shader, SpreadMode,
    Transform,
};

use super::svg::rgba_image_to_pixmap;
use super::{LayerEffect, RenderContext};
use crate::color::Rgb;
use crate::scene::{Background, ImageBackground};

/// Paints the scene background over the whole surface.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundLayer<'a> {
    pub background: &'a Background,
}

impl<'a> BackgroundLayer<'a> {
    pub fn new(background: &'a Background) -> Self {
        Self { background }
    }
}

impl LayerEffect for BackgroundLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        match self.background {
            Background::Gradient { from, to } => paint_gradient(ctx, *from, *to),
            Background::Solid { color } => ctx.surface.fill(opaque(*color)),
            Background::Image(image) => paint_image(ctx, image),
        }
    }
}

fn opaque(color: Rgb) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, 255)
}

/// Linear gradient from the top-left corner (stop 0) to the bottom-right corner (stop 1).
fn paint_gradient(ctx: &mut RenderContext, from: Rgb, to: Rgb) {
    let width = ctx.surface.width() as f32;
    let height = ctx.surface.height() as f32;

    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(width, height),
        vec![
            GradientStop::new(0.0, opaque(from)),
            GradientStop::new(1.0, opaque(to)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(opaque(from)));

    let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) else {
        return;
    };
    let paint = Paint {
        shader,
        anti_alias: false,
        ..Paint::default()
    };
    ctx.surface
        .fill_rect(rect, &paint, Transform::identity(), None);
}

/// Stretches the photo to exactly cover the surface, blurring it first when
/// a radius is set.
///
/// The blur is applied to a scratch copy, so nothing of it carries over to
/// the layers drawn afterwards.
fn paint_image(ctx: &mut RenderContext, image: &ImageBackground) {
    let width = ctx.surface.width();
    let height = ctx.surface.height();
    if image.bitmap.width() == 0 || image.bitmap.height() == 0 {
        tracing::warn!("skipping empty background image");
        return;
    }

    let mut stretched = imageops::resize(
        image.bitmap.as_ref(),
        width,
        height,
        FilterType::CatmullRom,
    );
    if image.blur_radius > 0.0 {
        stretched = imageops::fast_blur(&stretched, image.blur_radius);
    }

    let Some(layer) = rgba_image_to_pixmap(&stretched) else {
        return;
    };
    ctx.surface.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, LayoutGeometry};
    use image::{Rgba, RgbaImage};
    use palette::Srgb;
    use resvg::tiny_skia::Pixmap;

    fn small_ctx(width: u32, height: u32) -> RenderContext {
        let geometry = LayoutGeometry {
            width,
            height,
            crop_aspect: Layout::Square.geometry().crop_aspect,
        };
        RenderContext::new(Pixmap::new(width, height).unwrap(), geometry)
    }

    fn rgba_at(ctx: &RenderContext, x: u32, y: u32) -> [u8; 4] {
        let c = ctx.surface.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn solid_fills_everything() {
        let mut ctx = small_ctx(8, 6);
        let background = Background::Solid {
            color: Srgb::new(255, 0, 0),
        };
        BackgroundLayer::new(&background).apply(&mut ctx);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(rgba_at(&ctx, x, y), [255, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let mut ctx = small_ctx(100, 100);
        let background = Background::Gradient {
            from: Srgb::new(0, 0, 0),
            to: Srgb::new(255, 255, 255),
        };
        BackgroundLayer::new(&background).apply(&mut ctx);

        let top_left = rgba_at(&ctx, 0, 0);
        let bottom_right = rgba_at(&ctx, 99, 99);
        let top_right = rgba_at(&ctx, 99, 0);
        let bottom_left = rgba_at(&ctx, 0, 99);

        assert!(top_left[0] < 10, "top-left should be near `from`: {top_left:?}");
        assert!(bottom_right[0] > 245, "bottom-right should be near `to`: {bottom_right:?}");
        // The anti-diagonal sits halfway along the gradient.
        assert!((top_right[0] as i32 - bottom_left[0] as i32).abs() <= 2);
        assert!((top_right[0] as i32 - 128).abs() < 10);
        assert_eq!(top_left[3], 255);
    }

    #[test]
    fn image_is_stretched_to_cover() {
        let mut ctx = small_ctx(40, 20);
        let photo = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let background = Background::Image(ImageBackground::new(photo, 0.0));
        BackgroundLayer::new(&background).apply(&mut ctx);

        let left = rgba_at(&ctx, 0, 0);
        let right = rgba_at(&ctx, 39, 19);
        assert!(left[0] > 240 && left[2] < 15, "left edge should stay red: {left:?}");
        assert!(right[2] > 240 && right[0] < 15, "right edge should stay blue: {right:?}");
        assert!(left[3] >= 254 && right[3] >= 254);
    }

    #[test]
    fn blur_softens_edges() {
        let photo = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });

        let mut sharp = small_ctx(40, 40);
        let background = Background::Image(ImageBackground::new(photo.clone(), 0.0));
        BackgroundLayer::new(&background).apply(&mut sharp);

        let mut blurred = small_ctx(40, 40);
        let background = Background::Image(ImageBackground::new(photo, 4.0));
        BackgroundLayer::new(&background).apply(&mut blurred);

        let sharp_edge = rgba_at(&sharp, 18, 20)[0];
        let blurred_edge = rgba_at(&blurred, 18, 20)[0];
        assert!(sharp_edge < 10);
        assert!(blurred_edge > sharp_edge + 20, "blur should bleed white into black");
    }
}
