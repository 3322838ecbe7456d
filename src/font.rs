//! Font families, font descriptors and the font database text is shaped with.

use std::path::PathBuf;
use std::sync::Arc;

use resvg::usvg::fontdb::{Database, Family, Query};
use serde::{Deserialize, Serialize};

/// Family appended after the selected font, as a browser canvas would.
pub const FALLBACK_FAMILY: &str = "Arial";

/// The fonts offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum FontFamily {
    #[default]
    GmarketSans,
    NanumSquareNeo,
    Pretendard,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [
        FontFamily::GmarketSans,
        FontFamily::NanumSquareNeo,
        FontFamily::Pretendard,
    ];

    /// The family name fonts are registered under.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::GmarketSans => "GmarketSans",
            FontFamily::NanumSquareNeo => "NanumSquareNeo",
            FontFamily::Pretendard => "Pretendard",
        }
    }

    /// Human-readable label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            FontFamily::GmarketSans => "Gmarket Sans",
            FontFamily::NanumSquareNeo => "NanumSquare Neo",
            FontFamily::Pretendard => "Pretendard",
        }
    }
}

/// Resolved font for one text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub italic: bool,
    pub bold: bool,
    pub size_px: f32,
    pub family: FontFamily,
}

impl FontDescriptor {
    pub fn new(italic: bool, bold: bool, size_px: f32, family: FontFamily) -> Self {
        Self {
            italic,
            bold,
            size_px,
            family,
        }
    }

    pub fn weight_keyword(&self) -> &'static str {
        if self.bold { "bold" } else { "normal" }
    }

    pub fn style_keyword(&self) -> &'static str {
        if self.italic { "italic" } else { "normal" }
    }

    /// The family list, selected family first.
    pub fn family_list(&self) -> String {
        format!("{}, {}, sans-serif", self.family.name(), FALLBACK_FAMILY)
    }

    /// CSS font shorthand, e.g. `italic bold 120px GmarketSans, Arial`.
    pub fn to_css(&self) -> String {
        format!(
            "{}{} {}px {}, {}",
            if self.italic { "italic " } else { "" },
            self.weight_keyword(),
            self.size_px,
            self.family.name(),
            FALLBACK_FAMILY
        )
    }
}

// ============================================================================
// Font Library
// ============================================================================

/// Where the renderer looks for fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Extra directories scanned (recursively) for font files.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,

    /// Whether to load the fonts installed on the host.
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

impl RendererConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn default_true() -> bool {
    true
}

/// Shared, immutable font database.
#[derive(Clone)]
pub struct FontLibrary {
    db: Arc<Database>,
}

impl FontLibrary {
    /// A library with no fonts. Text draws become no-ops.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(Database::new()),
        }
    }

    /// Loads the host's installed fonts.
    pub fn system() -> Self {
        Self::from_config(&RendererConfig::default())
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        let mut db = Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        Self::from_database(db)
    }

    /// Wraps an existing database, repointing the generic sans-serif family
    /// at the first available face when the fallback family is missing.
    pub fn from_database(mut db: Database) -> Self {
        let has_fallback = db
            .query(&Query {
                families: &[Family::Name(FALLBACK_FAMILY)],
                ..Query::default()
            })
            .is_some();

        if !has_fallback {
            let first_family = db
                .faces()
                .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
            if let Some(name) = first_family {
                tracing::debug!(family = %name, "using first available face as sans-serif");
                db.set_sans_serif_family(name);
            }
        }

        tracing::debug!(faces = db.len(), "font library ready");
        Self { db: Arc::new(db) }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub(crate) fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}
