//! Serializable thumbnail profile for exchanging scenes with the host UI.
//!
//! A [`ThumbnailProfile`] captures every setting of a scene except the
//! uploaded photo itself, in a JSON-friendly format the host UI exchanges
//! with the renderer. It is an interchange format only; nothing here reads or
//! writes files.
//!
//! # Example
//!
//! ```
//! use thumbsup_renderer::{BackgroundSettings, ThumbnailProfile};
//!
//! let mut profile = ThumbnailProfile::default();
//! profile.title = "Weekly Recap".to_string();
//! profile.background = BackgroundSettings::Solid {
//!     color: "#1e293b".to_string(),
//! };
//!
//! let json = profile.to_json().unwrap();
//! let restored = ThumbnailProfile::from_json(&json).unwrap();
//! let scene = restored.into_scene(None).unwrap();
//! assert_eq!(scene.title, "Weekly Recap");
//! ```

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::{parse_hex, to_hex};
use crate::error::InputError;
use crate::font::FontFamily;
use crate::layout::Layout;
use crate::scene::{Background, ImageBackground, SceneDescription, Subtitle, TextAlign, TextStyle};

// ============================================================================
// Settings
// ============================================================================

/// Serializable background choice.
///
/// ```json
/// { "type": "gradient", "from": "#ff9a9e", "to": "#fecfef" }
/// // or
/// { "type": "solid", "color": "#1e293b" }
/// // or
/// { "type": "image", "blur": 4.0 }
/// ```
///
/// The image variant carries only the blur radius; the photo travels
/// separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundSettings {
    Gradient { from: String, to: String },
    Solid { color: String },
    Image {
        #[serde(default)]
        blur: f32,
    },
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        BackgroundSettings::from(&Background::default())
    }
}

impl From<&Background> for BackgroundSettings {
    fn from(background: &Background) -> Self {
        match background {
            Background::Gradient { from, to } => BackgroundSettings::Gradient {
                from: to_hex(*from),
                to: to_hex(*to),
            },
            Background::Solid { color } => BackgroundSettings::Solid {
                color: to_hex(*color),
            },
            Background::Image(image) => BackgroundSettings::Image {
                blur: image.blur_radius,
            },
        }
    }
}

impl BackgroundSettings {
    fn into_background(self, image: Option<Arc<RgbaImage>>) -> Result<Background, InputError> {
        Ok(match self {
            BackgroundSettings::Gradient { from, to } => Background::Gradient {
                from: parse_hex(&from)?,
                to: parse_hex(&to)?,
            },
            BackgroundSettings::Solid { color } => Background::Solid {
                color: parse_hex(&color)?,
            },
            BackgroundSettings::Image { blur } => {
                let bitmap = image.ok_or(InputError::MissingBackgroundImage)?;
                Background::Image(ImageBackground::new(bitmap, blur))
            }
        })
    }
}

/// Serializable subtitle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleSettings {
    pub text: String,
    pub visible: bool,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        let subtitle = Subtitle::default();
        Self {
            text: subtitle.text,
            visible: subtitle.visible,
        }
    }
}

/// Serializable text style, shared by the title and subtitle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSettings {
    pub bold: bool,
    pub italic: bool,
    pub shadow: bool,

    /// Text color as `#rrggbb`.
    pub color: String,

    pub align: TextAlign,

    /// Title size in percent of the shorter canvas side (5-20).
    pub font_size: f32,

    /// Subtitle size in percent of the shorter canvas side (3-15).
    pub sub_font_size: f32,

    pub font: FontFamily,
}

impl Default for StyleSettings {
    fn default() -> Self {
        StyleSettings::from(&TextStyle::default())
    }
}

impl From<&TextStyle> for StyleSettings {
    fn from(style: &TextStyle) -> Self {
        Self {
            bold: style.bold,
            italic: style.italic,
            shadow: style.shadow,
            color: to_hex(style.color),
            align: style.align,
            font_size: style.font_size_pct,
            sub_font_size: style.sub_font_size_pct,
            font: style.font_family,
        }
    }
}

impl StyleSettings {
    fn to_style(&self) -> Result<TextStyle, InputError> {
        Ok(TextStyle {
            bold: self.bold,
            italic: self.italic,
            shadow: self.shadow,
            color: parse_hex(&self.color)?,
            align: self.align,
            font_size_pct: self.font_size,
            sub_font_size_pct: self.sub_font_size,
            font_family: self.font,
        })
    }
}

// ============================================================================
// ThumbnailProfile
// ============================================================================

/// A serializable snapshot of every scene setting.
///
/// Missing fields take the editor's start-up defaults, so `{}` is a valid
/// profile.
///
/// # JSON Format
///
/// ```json
/// {
///   "layout": "16:9",
///   "background": { "type": "image", "blur": 4.0 },
///   "title": "Thumbs Up",
///   "subtitle": { "text": "Sub Title", "visible": true },
///   "style": {
///     "bold": true,
///     "italic": false,
///     "shadow": true,
///     "color": "#ffffff",
///     "align": "center",
///     "fontSize": 10.0,
///     "subFontSize": 6.0,
///     "font": "GmarketSans"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailProfile {
    /// Layout tag: `"1:1"`, `"4:3"` or `"16:9"`.
    pub layout: String,
    pub background: BackgroundSettings,
    pub title: String,
    pub subtitle: SubtitleSettings,
    pub style: StyleSettings,
}

impl Default for ThumbnailProfile {
    fn default() -> Self {
        Self::from_scene(&SceneDescription::default())
    }
}

impl ThumbnailProfile {
    /// Captures the settings of `scene`. The photo of an image background is
    /// not included.
    pub fn from_scene(scene: &SceneDescription) -> Self {
        Self {
            layout: scene.layout.tag().to_string(),
            background: BackgroundSettings::from(&scene.background),
            title: scene.title.clone(),
            subtitle: SubtitleSettings {
                text: scene.subtitle.text.clone(),
                visible: scene.subtitle.visible,
            },
            style: StyleSettings::from(&scene.style),
        }
    }

    /// Builds a validated scene from this profile.
    ///
    /// `image` supplies the photo for an image background and is ignored
    /// otherwise. Unknown layouts, malformed colors and out-of-range sizes
    /// are rejected rather than clamped.
    pub fn into_scene(self, image: Option<Arc<RgbaImage>>) -> Result<SceneDescription, InputError> {
        let scene = SceneDescription {
            layout: self.layout.parse::<Layout>()?,
            background: self.background.into_background(image)?,
            title: self.title,
            subtitle: Subtitle {
                text: self.subtitle.text,
                visible: self.subtitle.visible,
            },
            style: self.style.to_style()?,
        };
        scene.validate()?;
        Ok(scene)
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
