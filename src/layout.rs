//! Canvas geometry for the supported aspect layouts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bitmap::SizePx;
use crate::error::InputError;

/// One of the fixed thumbnail aspect layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Layout {
    /// 1200x1200.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 1600x1200.
    #[serde(rename = "4:3")]
    Standard,
    /// 1920x1080.
    #[serde(rename = "16:9")]
    Widescreen,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Square, Layout::Standard, Layout::Widescreen];

    /// The tag used by the control panel and profiles.
    pub fn tag(self) -> &'static str {
        match self {
            Layout::Square => "1:1",
            Layout::Standard => "4:3",
            Layout::Widescreen => "16:9",
        }
    }

    /// Parses a tag, falling back to [`Layout::Square`] for anything unknown.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|err: InputError| {
            tracing::warn!(%err, "falling back to 1:1 layout");
            Layout::Square
        })
    }

    pub fn geometry(self) -> LayoutGeometry {
        let (width, height, crop_aspect) = match self {
            Layout::Square => (1200, 1200, 1.0),
            Layout::Standard => (1600, 1200, 4.0 / 3.0),
            Layout::Widescreen => (1920, 1080, 16.0 / 9.0),
        };
        LayoutGeometry {
            width,
            height,
            crop_aspect,
        }
    }
}

impl FromStr for Layout {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.tag() == s)
            .ok_or_else(|| InputError::UnknownLayout(s.to_string()))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Pixel size of the canvas for a layout, plus the aspect ratio crops must keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub width: u32,
    pub height: u32,
    /// Width divided by height.
    pub crop_aspect: f32,
}

impl LayoutGeometry {
    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }

    /// The shorter canvas side as a float, the unit for font and shadow sizes.
    pub fn min_side(&self) -> f32 {
        self.size().min_side() as f32
    }
}

/// Maps a layout tag to canvas dimensions. Unknown tags resolve to `1:1`.
pub fn resolve(tag: &str) -> LayoutGeometry {
    Layout::from_tag(tag).geometry()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_dimensions() {
        let square = resolve("1:1");
        assert_eq!((square.width, square.height), (1200, 1200));
        assert_eq!(square.crop_aspect, 1.0);

        let standard = resolve("4:3");
        assert_eq!((standard.width, standard.height), (1600, 1200));
        assert!((standard.crop_aspect - 4.0 / 3.0).abs() < 1e-6);

        let wide = resolve("16:9");
        assert_eq!((wide.width, wide.height), (1920, 1080));
        assert!((wide.crop_aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_tag_falls_back_to_square() {
        for tag in ["", "3:2", "16x9", "1:1 "] {
            assert_eq!(resolve(tag), Layout::Square.geometry(), "tag {tag:?}");
        }
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!("16:9".parse::<Layout>(), Ok(Layout::Widescreen));
        assert_eq!(
            "21:9".parse::<Layout>(),
            Err(InputError::UnknownLayout("21:9".into()))
        );
    }

    #[test]
    fn tag_serialization() {
        let json = serde_json::to_string(&Layout::Standard).unwrap();
        assert_eq!(json, "\"4:3\"");
        let back: Layout = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(back, Layout::Widescreen);
        assert_eq!(Layout::Square.to_string(), "1:1");
    }
}
