//! Scene renderer: draws a [`SceneDescription`] into a fresh bitmap.

use resvg::tiny_skia::Pixmap;

use crate::bitmap::RenderedBitmap;
use crate::error::RenderError;
use crate::font::FontLibrary;
use crate::layer::svg::pixmap_to_rgba_image;
use crate::layer::{
    BackgroundLayer, LayerEffect, RenderContext, ShadowLayer, TextLayer, TextPlacement,
};
use crate::scene::SceneDescription;

/// Renders scenes against a fixed font library.
///
/// Rendering is deterministic: the same scene always yields the same pixels.
/// The renderer keeps no per-frame state, so one instance can serve any
/// number of scenes.
///
/// # Example
///
/// ```
/// use thumbsup_renderer::{FontLibrary, SceneDescription, SceneRenderer};
///
/// let renderer = SceneRenderer::new(FontLibrary::empty());
/// let bitmap = renderer.render(&SceneDescription::default()).unwrap();
/// assert_eq!(bitmap.dimensions().width, 1200);
/// ```
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    fonts: FontLibrary,
}

impl SceneRenderer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }

    /// A renderer using the fonts installed on the host.
    pub fn with_system_fonts() -> Self {
        Self::new(FontLibrary::system())
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Renders the scene.
    pub fn render(&self, scene: &SceneDescription) -> Result<RenderedBitmap, RenderError> {
        self.render_with_placement(scene).map(|(bitmap, _)| bitmap)
    }

    /// Renders the scene and reports where the text was anchored.
    ///
    /// Ranged fields are clamped before drawing, so a scene that slipped past
    /// validation still renders.
    #[tracing::instrument(skip_all, fields(layout = %scene.layout))]
    pub fn render_with_placement(
        &self,
        scene: &SceneDescription,
    ) -> Result<(RenderedBitmap, TextPlacement), RenderError> {
        if let Err(err) = scene.validate() {
            tracing::debug!(%err, "clamping out-of-range scene values");
        }
        let scene = scene.clamped();
        let geometry = scene.layout.geometry();

        // A fresh pixmap is fully transparent.
        let surface = Pixmap::new(geometry.width, geometry.height).ok_or(
            RenderError::SurfaceAllocation {
                width: geometry.width,
                height: geometry.height,
            },
        )?;
        let mut ctx = RenderContext::new(surface, geometry);

        BackgroundLayer::new(&scene.background).apply(&mut ctx);
        ShadowLayer {
            enabled: scene.style.shadow,
        }
        .apply(&mut ctx);
        TextLayer {
            title: &scene.title,
            subtitle: scene
                .subtitle
                .visible
                .then_some(scene.subtitle.text.as_str()),
            style: &scene.style,
            fonts: &self.fonts,
        }
        .apply(&mut ctx);

        let placement = ctx.get::<TextPlacement>().copied().unwrap_or_else(|| {
            TextPlacement::compute(&geometry, &scene.style, scene.subtitle.visible)
        });
        let bitmap = RenderedBitmap::new(pixmap_to_rgba_image(&ctx.surface));
        tracing::debug!(width = geometry.width, height = geometry.height, "frame rendered");
        Ok((bitmap, placement))
    }
}

// ============================================================================
// Tests
// ============================================================================
