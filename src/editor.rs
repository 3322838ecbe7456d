//! Thumbnail editing session: scene state, uploads and exports.

use std::sync::Arc;

use image::RgbaImage;

use crate::bitmap::RenderedBitmap;
use crate::color::{GradientPreset, TextContrast, dominant_color};
use crate::crop::{self, CropSpec, DisplaySize};
use crate::error::{Error, InputError, RenderError};
use crate::export::{self, ClipboardNotice, ClipboardSink, ExportArtifact};
use crate::font::FontLibrary;
use crate::profile::{BackgroundSettings, ThumbnailProfile};
use crate::renderer::SceneRenderer;
use crate::scene::{BLUR_RADIUS_RANGE, Background, ImageBackground, SceneDescription};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`ThumbnailProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    ///
    /// Invalid profiles leave the instance unchanged.
    fn apply_profile(&mut self, profile: &ThumbnailProfile) -> Result<(), InputError>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> ThumbnailProfile;
}

// ============================================================================
// Uploads
// ============================================================================

/// Receipt for a decoded upload that is waiting for its crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    id: u64,
    suggested_color: Option<&'static str>,
}

impl UploadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Text color picked for the photo, as `#000000` or `#ffffff`.
    ///
    /// `None` when no dominant color could be sampled.
    pub fn suggested_color(&self) -> Option<&'static str> {
        self.suggested_color
    }
}

struct PendingUpload {
    id: u64,
    image: RgbaImage,
}

// ============================================================================
// ThumbnailEditor
// ============================================================================

/// One editing session.
///
/// The editor owns the current [`SceneDescription`] and caches the last
/// rendered frame. Any mutation marks the frame dirty; the next call to
/// [`frame`](Self::frame) or an export re-renders it.
///
/// # Upload Flow
///
/// 1. [`begin_upload`](Self::begin_upload) decodes the file, samples its
///    dominant color and applies a readable text color.
/// 2. The host shows the photo with a crop box.
/// 3. [`confirm_crop`](Self::confirm_crop) extracts the region and makes it
///    the background.
///
/// A newer upload supersedes an older one, and confirming a superseded
/// ticket fails with [`Error::StaleUpload`].
///
/// # Example
///
/// ```
/// use thumbsup_renderer::{FontLibrary, SceneRenderer, ThumbnailEditor};
///
/// let mut editor = ThumbnailEditor::new(SceneRenderer::new(FontLibrary::empty()));
/// editor.update_scene(|scene| scene.title = "Hello".to_string());
///
/// let png = editor.export_png().unwrap();
/// assert!(!png.is_empty());
/// ```
pub struct ThumbnailEditor {
    renderer: SceneRenderer,
    scene: SceneDescription,
    frame: Option<RenderedBitmap>,
    dirty: bool,

    /// Blur applied to image backgrounds, kept across uploads.
    blur_radius: f32,

    pending: Option<PendingUpload>,
    last_ticket: u64,
}

impl ThumbnailEditor {
    /// Creates an editor showing the default scene.
    pub fn new(renderer: SceneRenderer) -> Self {
        Self::with_scene(renderer, SceneDescription::default())
    }

    pub fn with_scene(renderer: SceneRenderer, scene: SceneDescription) -> Self {
        let blur_radius = match &scene.background {
            Background::Image(image) => image.blur_radius,
            _ => 0.0,
        };
        Self {
            renderer,
            scene,
            frame: None,
            dirty: true,
            blur_radius,
            pending: None,
            last_ticket: 0,
        }
    }

    /// Convenience constructor using the host's installed fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(SceneRenderer::new(FontLibrary::system()))
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    pub fn scene(&self) -> &SceneDescription {
        &self.scene
    }

    /// Replaces the whole scene.
    pub fn set_scene(&mut self, scene: SceneDescription) {
        if let Background::Image(image) = &scene.background {
            self.blur_radius = image.blur_radius;
        }
        self.scene = scene;
        self.dirty = true;
    }

    /// Edits the scene in place.
    pub fn update_scene(&mut self, edit: impl FnOnce(&mut SceneDescription)) {
        edit(&mut self.scene);
        if let Background::Image(image) = &self.scene.background {
            self.blur_radius = image.blur_radius;
        }
        self.dirty = true;
    }

    /// True when the cached frame no longer matches the scene.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.frame.is_none()
    }

    /// Returns the current frame, rendering it first if the scene changed.
    pub fn frame(&mut self) -> Result<&RenderedBitmap, RenderError> {
        let frame = match self.frame.take() {
            Some(frame) if !self.dirty => frame,
            _ => {
                tracing::debug!("frame cache miss");
                self.renderer.render(&self.scene)?
            }
        };
        self.dirty = false;
        Ok(&*self.frame.insert(frame))
    }

    // ------------------------------------------------------------------------
    // Background controls
    // ------------------------------------------------------------------------

    /// Sets the blur used for image backgrounds (0-20 pixels).
    pub fn set_blur_radius(&mut self, radius: f32) -> Result<(), InputError> {
        let (min, max) = BLUR_RADIUS_RANGE;
        if !radius.is_finite() || !(min..=max).contains(&radius) {
            return Err(InputError::OutOfRange {
                field: "blur",
                value: radius,
                min,
                max,
            });
        }

        self.blur_radius = radius;
        if let Background::Image(image) = &mut self.scene.background {
            image.blur_radius = radius;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    /// Switches to a gradient preset. `index` wraps around the palette, so the
    /// caller can pass any random number.
    pub fn shuffle_gradient(&mut self, index: usize) {
        self.scene.background = Background::from_preset(GradientPreset::nth(index));
        self.dirty = true;
    }

    // ------------------------------------------------------------------------
    // Upload flow
    // ------------------------------------------------------------------------

    /// Decodes an uploaded file and stages it for cropping.
    ///
    /// The dominant color of the photo decides whether the text turns black or
    /// white. If no color can be sampled the text color is left alone.
    pub fn begin_upload(&mut self, bytes: &[u8]) -> Result<UploadTicket, Error> {
        let image = image::load_from_memory(bytes)?.to_rgba8();

        let suggested = match dominant_color(&image) {
            Some(sample) => {
                let contrast = TextContrast::for_sample(sample);
                self.scene.style.color = contrast.rgb();
                self.dirty = true;
                Some(contrast.as_hex())
            }
            None => {
                tracing::warn!("could not sample a dominant color; keeping text color");
                None
            }
        };

        self.last_ticket += 1;
        if let Some(previous) = self.pending.replace(PendingUpload {
            id: self.last_ticket,
            image,
        }) {
            tracing::debug!(superseded = previous.id, "replacing pending upload");
        }

        tracing::debug!(ticket = self.last_ticket, ?suggested, "upload staged");
        Ok(UploadTicket {
            id: self.last_ticket,
            suggested_color: suggested,
        })
    }

    /// The staged photo, for the host to display under its crop box.
    pub fn pending_image(&self) -> Option<&RgbaImage> {
        self.pending.as_ref().map(|pending| &pending.image)
    }

    /// The initial crop box: the largest centered region with the layout's
    /// aspect ratio.
    pub fn default_crop(&self, displayed: DisplaySize) -> CropSpec {
        CropSpec::centered(self.scene.layout.geometry().crop_aspect, displayed)
    }

    /// Crops the staged photo and makes it the background.
    ///
    /// On error the scene and the staged upload are left as they were.
    pub fn confirm_crop(
        &mut self,
        ticket: &UploadTicket,
        crop: &CropSpec,
        displayed: DisplaySize,
    ) -> Result<(), Error> {
        let pending = self.pending.as_ref().ok_or(Error::NoPendingUpload)?;
        if pending.id != ticket.id {
            return Err(Error::StaleUpload(ticket.id));
        }

        let cropped = crop::extract(&pending.image, displayed, crop)?;
        tracing::debug!(
            width = cropped.width(),
            height = cropped.height(),
            "crop committed"
        );

        self.pending = None;
        self.scene.background = Background::Image(ImageBackground::new(cropped, self.blur_radius));
        self.dirty = true;
        Ok(())
    }

    /// Drops the staged upload without touching the scene.
    pub fn cancel_upload(&mut self) {
        self.pending = None;
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Encodes the current frame as PNG.
    pub fn export_png(&mut self) -> Result<Vec<u8>, Error> {
        let bytes = export::to_png_bytes(self.frame()?)?;
        tracing::info!(bytes = bytes.len(), "exported PNG");
        Ok(bytes)
    }

    /// Encodes the current frame as a `thumbnail.png` download.
    pub fn download(&mut self) -> Result<ExportArtifact, Error> {
        let artifact = export::download_artifact(self.frame()?)?;
        tracing::info!(
            file = %artifact.file_name,
            bytes = artifact.bytes.len(),
            "prepared download"
        );
        Ok(artifact)
    }

    /// Copies the current frame to the clipboard.
    pub fn copy_to_clipboard(&mut self, sink: &mut impl ClipboardSink) -> ClipboardNotice {
        match self.frame() {
            Ok(frame) => {
                let notice = export::copy_to_clipboard(frame, sink);
                if notice.is_success() {
                    tracing::info!("copied thumbnail to clipboard");
                }
                notice
            }
            Err(err) => {
                tracing::warn!(%err, "failed to render frame for clipboard");
                ClipboardNotice::Failed(err.to_string())
            }
        }
    }
}

impl Configurable for ThumbnailEditor {
    /// Applies a profile to the session.
    ///
    /// An image background reuses the photo that is currently shown; the
    /// profile alone cannot bring one in.
    fn apply_profile(&mut self, profile: &ThumbnailProfile) -> Result<(), InputError> {
        let image = match &self.scene.background {
            Background::Image(image) => Some(Arc::clone(&image.bitmap)),
            _ => None,
        };
        let scene = profile.clone().into_scene(image)?;

        if let BackgroundSettings::Image { blur } = profile.background {
            self.blur_radius = blur;
        }
        self.scene = scene;
        self.dirty = true;
        Ok(())
    }

    fn export_profile(&self) -> ThumbnailProfile {
        ThumbnailProfile::from_scene(&self.scene)
    }
}

// ============================================================================
// Tests
// ============================================================================
