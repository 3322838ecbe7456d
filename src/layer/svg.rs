//! Text rasterization through resvg/usvg, plus pixmap conversions.
//!
//! Text runs are written into a small SVG document sized like the canvas and
//! rendered straight onto the frame surface, so glyphs composite over the
//! background already painted there.

use std::fmt::Write as _;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::shadow::ShadowState;
use crate::color::{Rgb, to_hex};
use crate::font::{FontDescriptor, FontLibrary};
use crate::scene::TextAlign;

const SHADOW_FILTER_ID: &str = "text-shadow";

// ============================================================================
// TextRun
// ============================================================================

/// One line of text anchored at `(x, y)`.
///
/// `y` is the vertical center of the em box; `x` is interpreted by the
/// document's alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub font: FontDescriptor,
}

/// Builds an SVG document drawing every non-empty run with the same fill,
/// alignment and shadow.
pub fn text_document(
    width: u32,
    height: u32,
    runs: &[TextRun<'_>],
    fill: Rgb,
    align: TextAlign,
    shadow: &ShadowState,
) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    if shadow.is_enabled() {
        let _ = write!(
            svg,
            r##"<defs><filter id="{SHADOW_FILTER_ID}" filterUnits="userSpaceOnUse" x="0" y="0" width="{width}" height="{height}"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="#000000" flood-opacity="{}"/></filter></defs>"##,
            shadow.offset_x,
            shadow.offset_y,
            shadow.std_deviation(),
            shadow.opacity,
        );
    }

    let anchor = match align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };
    let filter = if shadow.is_enabled() {
        format!(r#" filter="url(#{SHADOW_FILTER_ID})""#)
    } else {
        String::new()
    };

    for run in runs.iter().filter(|run| !run.text.is_empty()) {
        let _ = write!(
            svg,
            r#"<text xml:space="preserve" x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" text-anchor="{anchor}" dominant-baseline="central" fill="{}"{filter}>{}</text>"#,
            run.x,
            run.y,
            escape_xml(&run.font.family_list()),
            run.font.size_px,
            run.font.weight_keyword(),
            run.font.style_keyword(),
            to_hex(fill),
            escape_xml(run.text),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Parses `svg_data` against the font library and renders it over `surface`.
pub fn render_svg_onto(
    svg_data: &str,
    fonts: &FontLibrary,
    surface: &mut Pixmap,
) -> Result<(), resvg::usvg::Error> {
    let opts = Options {
        fontdb: fonts.database(),
        ..Options::default()
    };
    let tree = Tree::from_str(svg_data, &opts)?;
    resvg::render(&tree, Transform::identity(), &mut surface.as_mut());
    Ok(())
}

/// Escapes text for use in XML content and attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// Pixmap Conversions
// ============================================================================

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia stores premultiplied alpha
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}

/// Converts a straight-alpha image into a premultiplied pixmap.
///
/// Returns `None` for empty images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        data.extend_from_slice(&[premultiply(r, a), premultiply(g, a), premultiply(b, a), a]);
    }
    Pixmap::from_vec(data, size)
}

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFamily;
    use palette::Srgb;

    fn run(text: &str) -> TextRun<'_> {
        TextRun {
            text,
            x: 600.0,
            y: 540.0,
            font: FontDescriptor::new(true, true, 120.0, FontFamily::Pretendard),
        }
    }

    #[test]
    fn document_carries_text_attributes() {
        let svg = text_document(
            1200,
            1200,
            &[run("Hello")],
            Srgb::new(0, 255, 0),
            TextAlign::Right,
            &ShadowState::default(),
        );
        assert!(svg.contains(r#"x="600" y="540""#));
        assert!(svg.contains(r#"font-size="120""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"font-style="italic""#));
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(r#"dominant-baseline="central""#));
        assert!(svg.contains(r##"fill="#00ff00""##));
        assert!(svg.contains(">Hello</text>"));
        assert!(!svg.contains("feDropShadow"));
    }

    #[test]
    fn document_adds_shadow_filter() {
        let shadow = ShadowState::for_canvas(true, 1200.0);
        let svg = text_document(
            1200,
            1200,
            &[run("A")],
            Srgb::new(255, 255, 255),
            TextAlign::Center,
            &shadow,
        );
        assert!(svg.contains(r#"<feDropShadow dx="10" dy="10" stdDeviation="10""#));
        assert!(svg.contains(r#"flood-opacity="0.25""#));
        assert!(svg.contains(r##"filter="url(#text-shadow)""##));
    }

    #[test]
    fn empty_runs_are_skipped_and_text_escaped() {
        let svg = text_document(
            100,
            100,
            &[run(""), run("<b>&\"'")],
            Srgb::new(0, 0, 0),
            TextAlign::Left,
            &ShadowState::default(),
        );
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(svg.contains("&lt;b&gt;&amp;&quot;&apos;</text>"));
    }

    #[test]
    fn document_parses_without_fonts() {
        let svg = text_document(
            64,
            32,
            &[run("x & y")],
            Srgb::new(10, 20, 30),
            TextAlign::Center,
            &ShadowState::for_canvas(true, 32.0),
        );
        let mut surface = Pixmap::new(64, 32).unwrap();
        render_svg_onto(&svg, &FontLibrary::empty(), &mut surface).unwrap();
        // No faces means no glyphs.
        assert!(surface.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn pixmap_conversion_roundtrip() {
        let img = RgbaImage::from_fn(3, 2, |x, y| {
            if x == 0 {
                Rgba([200, 100, 50, 255])
            } else if y == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 0, 0, 128])
            }
        });
        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(&pixmap);

        assert_eq!(back.get_pixel(0, 0).0, [200, 100, 50, 255]);
        assert_eq!(back.get_pixel(1, 0).0, [0, 0, 0, 0]);
        let half = back.get_pixel(2, 1).0;
        assert_eq!(half[3], 128);
        assert!(half[0] >= 254, "red should survive premultiplication, got {half:?}");
    }

    #[test]
    fn empty_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 0)).is_none());
    }
}
