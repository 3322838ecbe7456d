//! Raster types shared by the crop extractor, renderer and exporter.

use image::RgbaImage;

/// A rectangle defined in native pixel coordinates.
///
/// Produced by mapping a displayed-space crop onto the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The shorter of the two sides. Text sizes and shadow metrics scale with it.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The output of one render call.
///
/// Pixels are straight (non-premultiplied) RGBA. A bitmap is handed out by
/// value once drawing completes, so exports always see a finished frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBitmap {
    /// The image data in RGBA format.
    pub data: RgbaImage,
}

impl RenderedBitmap {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Returns the pixel dimensions of the bitmap.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns true if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.dimensions().area() == 0
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.data.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Consumes the bitmap and returns the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}

impl From<RgbaImage> for RenderedBitmap {
    fn from(data: RgbaImage) -> Self {
        Self::new(data)
    }
}
