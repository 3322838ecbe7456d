//! thumbsup-renderer: thumbnail compositing engine
//!
//! This crate renders social-media style thumbnails: a gradient, solid or
//! cropped photo background with a styled title and optional subtitle on top,
//! exported as PNG.
//!
//! # Example
//!
//! ```
//! use thumbsup_renderer::{
//!     Background, FontLibrary, Layout, SceneDescription, SceneRenderer, to_png_bytes,
//! };
//! use palette::Srgb;
//!
//! let renderer = SceneRenderer::new(FontLibrary::empty());
//!
//! let mut scene = SceneDescription::default();
//! scene.layout = Layout::Widescreen;
//! scene.background = Background::Solid { color: Srgb::new(30, 41, 59) };
//! scene.title = "Release Notes".to_string();
//!
//! let bitmap = renderer.render(&scene).unwrap();
//! assert_eq!(bitmap.pixel(0, 0), Some([30, 41, 59, 255]));
//!
//! let png = to_png_bytes(&bitmap).unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Editing Sessions
//!
//! [`ThumbnailEditor`] keeps a scene, re-renders only when it changed and
//! drives the upload-then-crop flow. Settings move in and out of a session as
//! a [`ThumbnailProfile`] with the [`Configurable`] trait:
//!
//! ```
//! use thumbsup_renderer::{
//!     Configurable, FontLibrary, SceneRenderer, ThumbnailEditor, ThumbnailProfile,
//! };
//!
//! let mut editor = ThumbnailEditor::new(SceneRenderer::new(FontLibrary::empty()));
//!
//! // Apply a profile received as JSON
//! let profile = ThumbnailProfile::from_json(r#"{ "layout": "4:3", "title": "Hi" }"#).unwrap();
//! editor.apply_profile(&profile).unwrap();
//!
//! // Export current settings
//! let exported = editor.export_profile();
//! let json = exported.to_json().unwrap();
//! assert!(json.contains("\"4:3\""));
//! ```

mod bitmap;
mod color;
mod crop;
mod editor;
mod error;
mod export;
mod font;
mod layer;
mod layout;
mod profile;
mod renderer;
mod scene;

pub use bitmap::{RectPx, RenderedBitmap, SizePx};
pub use color::{
    BLACK, GRADIENT_PRESETS, GradientPreset, Rgb, TextContrast, WHITE, dominant_color, parse_hex,
    perceived_brightness, suggest_text_color, to_hex,
};
pub use crop::{CropSpec, CropUnit, DisplaySize, extract};
pub use editor::{Configurable, ThumbnailEditor, UploadTicket};
pub use error::{Error, ExportError, ExtractionError, InputError, RenderError};
pub use export::{
    ClipboardNotice, ClipboardPayload, ClipboardSink, DEFAULT_FILE_NAME, ExportArtifact,
    PNG_MIME_TYPE, copy_to_clipboard, download_artifact, to_png_blob_handle, to_png_bytes,
};
pub use font::{FALLBACK_FAMILY, FontDescriptor, FontFamily, FontLibrary, RendererConfig};
pub use layer::{
    LayerEffect, RenderContext, ShadowState, SubtitlePlacement, TEXT_MARGIN, TextPlacement,
};
pub use layout::{Layout, LayoutGeometry, resolve};
pub use profile::{BackgroundSettings, StyleSettings, SubtitleSettings, ThumbnailProfile};
pub use renderer::SceneRenderer;
pub use scene::{
    BLUR_RADIUS_RANGE, Background, FONT_SIZE_RANGE, ImageBackground, SUB_FONT_SIZE_RANGE,
    SceneDescription, Subtitle, TextAlign, TextStyle,
};
