//! Maps a displayed-space crop onto the native image and extracts it.
//!
//! Crop widgets work on the image as it is shown on screen, which is usually
//! scaled down. [`extract`] converts the crop rectangle into native pixels
//! (`scale = native / displayed` per axis) and copies that region out.

use image::RgbaImage;
use image::imageops;

use crate::bitmap::RectPx;
use crate::error::ExtractionError;

/// Unit of the crop rectangle's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropUnit {
    /// Percent of the displayed width (x, width) or height (y, height).
    #[default]
    Percent,
    /// Displayed pixels.
    Pixel,
}

/// The size an image is shown at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A crop rectangle relative to the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSpec {
    pub unit: CropUnit,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CropSpec {
    fn default() -> Self {
        Self::full()
    }
}

impl CropSpec {
    pub fn pixels(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    pub fn percent(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// The whole image.
    pub fn full() -> Self {
        Self::percent(0.0, 0.0, 100.0, 100.0)
    }

    /// The largest centered crop with the given width/height ratio.
    pub fn centered(aspect: f32, displayed: DisplaySize) -> Self {
        let shown_aspect = displayed.width / displayed.height;
        if !aspect.is_finite() || aspect <= 0.0 || !shown_aspect.is_finite() {
            return Self::full();
        }
        let (width, height) = if shown_aspect > aspect {
            (aspect / shown_aspect * 100.0, 100.0)
        } else {
            (100.0, shown_aspect / aspect * 100.0)
        };
        Self::percent((100.0 - width) / 2.0, (100.0 - height) / 2.0, width, height)
    }

    /// The rectangle in displayed pixels as `(x, y, width, height)`.
    pub fn to_displayed_px(&self, displayed: DisplaySize) -> (f32, f32, f32, f32) {
        match self.unit {
            CropUnit::Pixel => (self.x, self.y, self.width, self.height),
            CropUnit::Percent => (
                self.x * displayed.width / 100.0,
                self.y * displayed.height / 100.0,
                self.width * displayed.width / 100.0,
                self.height * displayed.height / 100.0,
            ),
        }
    }

    /// Maps the crop into native pixels of a `native_width` x `native_height`
    /// image, clamped to its bounds. The result may be empty.
    pub fn to_native_rect(
        &self,
        displayed: DisplaySize,
        native_width: u32,
        native_height: u32,
    ) -> Result<RectPx, ExtractionError> {
        if !displayed.is_valid() {
            return Err(ExtractionError::InvalidDisplaySize {
                width: displayed.width,
                height: displayed.height,
            });
        }

        let scale_x = native_width as f32 / displayed.width;
        let scale_y = native_height as f32 / displayed.height;
        let (x, y, width, height) = self.to_displayed_px(displayed);

        let (x0, x1) = native_span(x, width, scale_x, native_width);
        let (y0, y1) = native_span(y, height, scale_y, native_height);
        Ok(RectPx::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Scales `[start, start + len)` and clamps it to `0..=limit`.
fn native_span(start: f32, len: f32, scale: f32, limit: u32) -> (u32, u32) {
    let clamp = |v: f32| {
        if v.is_nan() {
            0
        } else {
            v.round().clamp(0.0, limit as f32) as u32
        }
    };
    let a = clamp(start * scale);
    let b = clamp((start + len) * scale);
    (a.min(b), a.max(b))
}

/// Copies the cropped region of `source` into a new image at native resolution.
///
/// Callers commit the result as a background only on `Ok`; zero-area crops
/// are reported as [`ExtractionError::ZeroArea`].
pub fn extract(
    source: &RgbaImage,
    displayed: DisplaySize,
    crop: &CropSpec,
) -> Result<RgbaImage, ExtractionError> {
    if source.width() == 0 || source.height() == 0 {
        return Err(ExtractionError::EmptySource);
    }

    let rect = crop.to_native_rect(displayed, source.width(), source.height())?;
    if rect.is_empty() {
        return Err(ExtractionError::ZeroArea {
            width: rect.width,
            height: rect.height,
        });
    }

    tracing::debug!(?rect, "extracting crop");
    Ok(imageops::crop_imm(source, rect.x, rect.y, rect.width, rect.height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Each pixel encodes its own coordinates.
    fn coordinate_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, (x / 256) as u8, (y / 256) as u8])
        })
    }

    fn coords(pixel: &Rgba<u8>) -> (u32, u32) {
        let [xl, yl, xh, yh] = pixel.0;
        (xl as u32 + xh as u32 * 256, yl as u32 + yh as u32 * 256)
    }

    #[test]
    fn scaled_pixel_crop() {
        let source = coordinate_image(2000, 1000);
        let displayed = DisplaySize::new(1000.0, 500.0);
        let crop = CropSpec::pixels(100.0, 50.0, 200.0, 100.0);

        let rect = crop.to_native_rect(displayed, 2000, 1000).unwrap();
        assert_eq!(rect, RectPx::new(200, 100, 400, 200));

        let out = extract(&source, displayed, &crop).unwrap();
        assert_eq!(out.dimensions(), (400, 200));
        assert_eq!(coords(out.get_pixel(0, 0)), (200, 100));
        assert_eq!(coords(out.get_pixel(399, 199)), (599, 299));
    }

    #[test]
    fn percent_crop() {
        let source = coordinate_image(400, 200);
        let displayed = DisplaySize::new(200.0, 100.0);
        let crop = CropSpec::percent(25.0, 50.0, 50.0, 50.0);

        let out = extract(&source, displayed, &crop).unwrap();
        assert_eq!(out.dimensions(), (200, 100));
        assert_eq!(coords(out.get_pixel(0, 0)), (100, 100));
    }

    #[test]
    fn crop_is_clamped_to_source() {
        let source = coordinate_image(100, 100);
        let displayed = DisplaySize::new(100.0, 100.0);
        let crop = CropSpec::pixels(80.0, -10.0, 50.0, 50.0);

        let rect = crop.to_native_rect(displayed, 100, 100).unwrap();
        assert_eq!(rect, RectPx::new(80, 0, 20, 40));
        let out = extract(&source, displayed, &crop).unwrap();
        assert_eq!(out.dimensions(), (20, 40));
    }

    #[test]
    fn zero_area_is_rejected() {
        let source = coordinate_image(100, 100);
        let displayed = DisplaySize::new(100.0, 100.0);

        let result = extract(&source, displayed, &CropSpec::pixels(10.0, 10.0, 0.0, 30.0));
        assert!(matches!(result, Err(ExtractionError::ZeroArea { width: 0, .. })));

        let outside = extract(&source, displayed, &CropSpec::pixels(150.0, 0.0, 20.0, 20.0));
        assert!(matches!(outside, Err(ExtractionError::ZeroArea { .. })));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let source = coordinate_image(10, 10);
        let result = extract(&source, DisplaySize::new(0.0, 10.0), &CropSpec::full());
        assert!(matches!(result, Err(ExtractionError::InvalidDisplaySize { .. })));

        let empty = RgbaImage::new(0, 0);
        let result = extract(&empty, DisplaySize::new(10.0, 10.0), &CropSpec::full());
        assert_eq!(result, Err(ExtractionError::EmptySource));
    }

    #[test]
    fn extraction_is_deterministic() {
        let source = coordinate_image(300, 300);
        let displayed = DisplaySize::new(150.0, 150.0);
        let crop = CropSpec::pixels(10.3, 20.7, 33.3, 44.4);
        let a = extract(&source, displayed, &crop).unwrap();
        let b = extract(&source, displayed, &crop).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn centered_crop_keeps_aspect() {
        let displayed = DisplaySize::new(1000.0, 500.0);
        let crop = CropSpec::centered(1.0, displayed);
        let (x, y, w, h) = crop.to_displayed_px(displayed);
        assert!((w - 500.0).abs() < 1e-3);
        assert!((h - 500.0).abs() < 1e-3);
        assert!((x - 250.0).abs() < 1e-3);
        assert_eq!(y, 0.0);

        let tall = DisplaySize::new(400.0, 800.0);
        let crop = CropSpec::centered(16.0 / 9.0, tall);
        let (_, _, w, h) = crop.to_displayed_px(tall);
        assert!((w - 400.0).abs() < 1e-3);
        assert!((w / h - 16.0 / 9.0).abs() < 1e-3);
    }
}
