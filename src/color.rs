//! Color parsing, contrast analysis and dominant-color extraction.

use std::collections::HashMap;
use std::str::FromStr;

use image::RgbaImage;
use palette::Srgb;

use crate::error::InputError;

/// An 8-bit sRGB color.
pub type Rgb = Srgb<u8>;

pub const BLACK: Rgb = Srgb::new(0, 0, 0);
pub const WHITE: Rgb = Srgb::new(255, 255, 255);

/// Parses `#rrggbb` or `#rgb` (leading `#` optional).
pub fn parse_hex(value: &str) -> Result<Rgb, InputError> {
    Rgb::from_str(value.trim()).map_err(|e| InputError::InvalidColor {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ============================================================================
// Contrast
// ============================================================================

/// Perceived brightness using the ITU-R BT.601 luma weights, in `0.0..=255.0`.
pub fn perceived_brightness(color: Rgb) -> f32 {
    let weighted =
        color.red as u32 * 299 + color.green as u32 * 587 + color.blue as u32 * 114;
    weighted as f32 / 1000.0
}

/// A text color guaranteed to read against a given background sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextContrast {
    Black,
    White,
}

impl TextContrast {
    /// Picks black for bright samples (brightness strictly above 128), white otherwise.
    pub fn for_sample(sample: Rgb) -> Self {
        if perceived_brightness(sample) > 128.0 {
            TextContrast::Black
        } else {
            TextContrast::White
        }
    }

    pub fn as_hex(self) -> &'static str {
        match self {
            TextContrast::Black => "#000000",
            TextContrast::White => "#ffffff",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            TextContrast::Black => BLACK,
            TextContrast::White => WHITE,
        }
    }
}

/// Returns `"#000000"` or `"#ffffff"`, whichever reads better on `sample`.
pub fn suggest_text_color(sample: Rgb) -> &'static str {
    TextContrast::for_sample(sample).as_hex()
}

// ============================================================================
// Dominant Color
// ============================================================================

/// Only every n-th pixel is sampled.
const SAMPLE_STRIDE: usize = 10;
/// Bits kept per channel when bucketing colors.
const QUANT_BITS: u32 = 5;
const MIN_ALPHA: u8 = 125;
const NEAR_WHITE: u8 = 250;

/// Finds the most common color of an image.
///
/// Colors are bucketed at 5 bits per channel; the mean color of the most
/// populated bucket is returned. Mostly transparent and near-white pixels are
/// ignored. Returns `None` when no pixel qualifies, in which case callers keep
/// their current text color.
pub fn dominant_color(image: &RgbaImage) -> Option<Rgb> {
    let shift = 8 - QUANT_BITS;
    let mut buckets: HashMap<u32, (u64, [u64; 3])> = HashMap::new();

    for pixel in image.pixels().step_by(SAMPLE_STRIDE) {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA || (r > NEAR_WHITE && g > NEAR_WHITE && b > NEAR_WHITE) {
            continue;
        }
        let key = ((r as u32 >> shift) << (2 * QUANT_BITS))
            | ((g as u32 >> shift) << QUANT_BITS)
            | (b as u32 >> shift);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += r as u64;
        entry.1[1] += g as u64;
        entry.1[2] += b as u64;
    }

    // Ties go to the lower bucket key so the result never depends on hash order.
    let (_, (count, sums)) = buckets
        .into_iter()
        .max_by(|(ka, (ca, _)), (kb, (cb, _))| ca.cmp(cb).then(kb.cmp(ka)))?;

    Some(Srgb::new(
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ))
}

// ============================================================================
// Gradient Presets
// ============================================================================

/// A two-stop gradient from the preset palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientPreset {
    pub from: Rgb,
    pub to: Rgb,
}

const fn rgb(hex: u32) -> Rgb {
    Srgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const fn preset(from: u32, to: u32) -> GradientPreset {
    GradientPreset {
        from: rgb(from),
        to: rgb(to),
    }
}

pub const GRADIENT_PRESETS: [GradientPreset; 30] = [
    preset(0xFF6B6B, 0x4ECDC4),
    preset(0xA8E6CF, 0xFFD3B6),
    preset(0x3494E6, 0xEC6EAD),
    preset(0x11998E, 0x38EF7D),
    preset(0xFC466B, 0x3F5EFB),
    preset(0x8A2387, 0xF27121),
    preset(0x43C6AC, 0x191654),
    preset(0xFF9966, 0xFF5E62),
    preset(0x00B4DB, 0x0083B0),
    preset(0xFDC830, 0xF37335),
    preset(0x5433FF, 0x20BDFF),
    preset(0xA8CABA, 0x5D4157),
    preset(0x2193B0, 0x6DD5ED),
    preset(0xCC2B5E, 0x753A88),
    preset(0x42275A, 0x734B6D),
    preset(0xDE6262, 0xFFB88C),
    preset(0x06BEB6, 0x48B1BF),
    preset(0xEB3349, 0xF45C43),
    preset(0xDD5E89, 0xF7BB97),
    preset(0x56AB2F, 0xA8E063),
    preset(0x614385, 0x516395),
    preset(0xEECDA3, 0xEF629F),
    preset(0x1FA2FF, 0x12D8FA),
    preset(0x4FACFE, 0x00F2FE),
    preset(0xF83600, 0xF9D423),
    preset(0x00CDAC, 0x8DDAD5),
    preset(0xFF0844, 0xFFB199),
    preset(0xFBAB7E, 0xF7CE68),
    preset(0xFF758C, 0xFF7EB3),
    preset(0x08203E, 0x557C93),
];

impl GradientPreset {
    /// Returns the preset at `index`, wrapping around the palette.
    ///
    /// Callers supply their own randomness for "shuffle".
    pub fn nth(index: usize) -> Self {
        GRADIENT_PRESETS[index % GRADIENT_PRESETS.len()]
    }
}

impl Default for GradientPreset {
    fn default() -> Self {
        GRADIENT_PRESETS[0]
    }
}
