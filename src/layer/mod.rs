//! Layer infrastructure for scene rendering.
//!
//! A frame is drawn by applying layers in a fixed order onto one surface:
//!
//! ```text
//! fresh surface (transparent)
//!     │
//!     ▼
//! ┌────────────┐
//! │ Background │ ◄── gradient, solid fill or blurred image
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Shadow   │ ◄── emits ShadowState (no pixels)
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │    Text    │ ◄── consumes ShadowState, emits TextPlacement
//! └────────────┘
//! ```
//!
//! Reordering the layers changes the visible output. Properties flow
//! between layers through [`RenderContext`], so a layer never reaches into
//! another layer's configuration.

pub mod background;
pub mod shadow;
pub mod svg;
pub mod text;

pub use background::BackgroundLayer;
pub use shadow::{ShadowLayer, ShadowState};
pub use text::{SubtitlePlacement, TEXT_MARGIN, TextLayer, TextPlacement};

use std::any::{Any, TypeId};
use std::collections::HashMap;

use resvg::tiny_skia::Pixmap;

use crate::layout::LayoutGeometry;

// ============================================================================
// Render Context
// ============================================================================

/// State that flows through the layer pipeline during one draw.
///
/// # Example
///
/// ```ignore
/// // Upstream layer emits a property
/// ctx.set(ShadowState::for_canvas(true, 1200.0));
///
/// // Downstream layer reads the property
/// let shadow = ctx.get::<ShadowState>().copied().unwrap_or_default();
/// ```
pub struct RenderContext {
    /// The surface being drawn, premultiplied RGBA.
    pub surface: Pixmap,

    /// Canvas geometry of the frame.
    pub geometry: LayoutGeometry,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    pub fn new(surface: Pixmap, geometry: LayoutGeometry) -> Self {
        Self {
            surface,
            geometry,
            properties: HashMap::new(),
        }
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

}

// ============================================================================
// Layer Trait
// ============================================================================

/// One stage of the render pipeline.
///
/// [`paint`](Self::paint) draws onto the surface; [`emit`](Self::emit)
/// publishes properties for later layers. Keeping them apart makes the data
/// flow between layers explicit.
pub trait LayerEffect {
    /// Draws this layer onto `ctx.surface`, reading upstream properties as needed.
    fn paint(&self, ctx: &mut RenderContext);

    /// Emits properties for downstream layers. Called after `paint`.
    fn emit(&self, _ctx: &mut RenderContext) {}

    /// Paints, then emits.
    fn apply(&self, ctx: &mut RenderContext) {
        self.paint(ctx);
        self.emit(ctx);
    }
}
