//! The declarative description of one thumbnail frame.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::{GradientPreset, Rgb, WHITE};
use crate::error::InputError;
use crate::font::FontFamily;
use crate::layout::Layout;

/// Allowed range for the title size, in percent of the shorter canvas side.
pub const FONT_SIZE_RANGE: (f32, f32) = (5.0, 20.0);
/// Allowed range for the subtitle size, in percent of the shorter canvas side.
pub const SUB_FONT_SIZE_RANGE: (f32, f32) = (3.0, 15.0);
/// Allowed range for the background blur radius, in pixels.
pub const BLUR_RADIUS_RANGE: (f32, f32) = (0.0, 20.0);

// ============================================================================
// TextStyle
// ============================================================================

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Styling shared by the title and subtitle.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub shadow: bool,
    pub color: Rgb,
    pub align: TextAlign,
    /// Title size in percent of the shorter canvas side (5..=20).
    pub font_size_pct: f32,
    /// Subtitle size in percent of the shorter canvas side (3..=15).
    pub sub_font_size_pct: f32,
    pub font_family: FontFamily,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            shadow: true,
            color: WHITE,
            align: TextAlign::Center,
            font_size_pct: 10.0,
            sub_font_size_pct: 6.0,
            font_family: FontFamily::default(),
        }
    }
}

impl TextStyle {
    /// Rejects font sizes outside their allowed ranges.
    pub fn validate(&self) -> Result<(), InputError> {
        check_range("fontSize", self.font_size_pct, FONT_SIZE_RANGE)?;
        check_range("subFontSize", self.sub_font_size_pct, SUB_FONT_SIZE_RANGE)
    }

    /// Returns a copy with font sizes pulled into their allowed ranges.
    pub fn clamped(&self) -> Self {
        Self {
            font_size_pct: clamp_to(self.font_size_pct, FONT_SIZE_RANGE),
            sub_font_size_pct: clamp_to(self.sub_font_size_pct, SUB_FONT_SIZE_RANGE),
            ..self.clone()
        }
    }
}

// ============================================================================
// Background
// ============================================================================

/// A cropped photo used as the background.
///
/// The bitmap is shared so cloning a scene stays cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBackground {
    pub bitmap: Arc<RgbaImage>,
    /// Gaussian blur radius in canvas pixels (0..=20). Zero disables the blur.
    pub blur_radius: f32,
}

impl ImageBackground {
    pub fn new(bitmap: impl Into<Arc<RgbaImage>>, blur_radius: f32) -> Self {
        Self {
            bitmap: bitmap.into(),
            blur_radius,
        }
    }
}

/// What gets painted under the text. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Linear gradient from the top-left to the bottom-right corner.
    Gradient { from: Rgb, to: Rgb },
    Solid { color: Rgb },
    Image(ImageBackground),
}

impl Background {
    pub fn from_preset(preset: GradientPreset) -> Self {
        Background::Gradient {
            from: preset.from,
            to: preset.to,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::from_preset(GradientPreset::default())
    }
}

// ============================================================================
// SceneDescription
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    pub text: String,
    pub visible: bool,
}

impl Default for Subtitle {
    fn default() -> Self {
        Self {
            text: "Sub Title".to_string(),
            visible: true,
        }
    }
}

/// Everything needed to render one thumbnail.
///
/// Rebuilt by the caller on every edit; the renderer never keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub layout: Layout,
    pub background: Background,
    pub title: String,
    pub subtitle: Subtitle,
    pub style: TextStyle,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            background: Background::default(),
            title: "Thumbs Up".to_string(),
            subtitle: Subtitle::default(),
            style: TextStyle::default(),
        }
    }
}

impl SceneDescription {
    /// Checks every ranged field.
    pub fn validate(&self) -> Result<(), InputError> {
        self.style.validate()?;
        if let Background::Image(image) = &self.background {
            check_range("blur", image.blur_radius, BLUR_RADIUS_RANGE)?;
        }
        Ok(())
    }

    /// Returns a copy with every ranged field clamped.
    ///
    /// The renderer draws from the clamped copy, so out-of-range values never
    /// reach the rasterizer.
    pub fn clamped(&self) -> Self {
        let background = match &self.background {
            Background::Image(image) => Background::Image(ImageBackground {
                bitmap: Arc::clone(&image.bitmap),
                blur_radius: clamp_to(image.blur_radius, BLUR_RADIUS_RANGE),
            }),
            other => other.clone(),
        };
        Self {
            background,
            style: self.style.clamped(),
            ..self.clone()
        }
    }
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), InputError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// NaN maps to the lower bound.
fn clamp_to(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_start_state() {
        let scene = SceneDescription::default();
        assert_eq!(scene.layout, Layout::Square);
        assert_eq!(scene.title, "Thumbs Up");
        assert!(scene.subtitle.visible);
        assert!(scene.style.shadow);
        assert_eq!(scene.style.color, WHITE);
        assert_eq!(scene.style.font_size_pct, 10.0);
        assert_eq!(scene.style.sub_font_size_pct, 6.0);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_sizes() {
        let mut style = TextStyle::default();
        style.font_size_pct = 25.0;
        assert!(matches!(
            style.validate(),
            Err(InputError::OutOfRange { field: "fontSize", .. })
        ));

        let mut style = TextStyle::default();
        style.sub_font_size_pct = 2.0;
        assert!(matches!(
            style.validate(),
            Err(InputError::OutOfRange { field: "subFontSize", .. })
        ));

        style.sub_font_size_pct = f32::NAN;
        assert!(style.validate().is_err());
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let mut scene = SceneDescription::default();
        scene.style.font_size_pct = 40.0;
        scene.style.sub_font_size_pct = f32::NAN;
        scene.background = Background::Image(ImageBackground::new(RgbaImage::new(2, 2), -3.0));

        let clamped = scene.clamped();
        assert_eq!(clamped.style.font_size_pct, 20.0);
        assert_eq!(clamped.style.sub_font_size_pct, 3.0);
        match clamped.background {
            Background::Image(image) => assert_eq!(image.blur_radius, 0.0),
            other => panic!("expected image background, got {other:?}"),
        }
        assert!(scene.clamped().validate().is_ok());
    }
}
