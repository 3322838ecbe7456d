//! Error types for scene validation, cropping, rendering and export.

use thiserror::Error;

/// A scene field that is malformed or out of its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown layout tag `{0}`")]
    UnknownLayout(String),

    #[error("invalid hex color `{value}`: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("image background requested but no image is available")]
    MissingBackgroundImage,
}

/// A crop request that cannot produce a usable background.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("crop rectangle has zero area ({width}x{height} native pixels)")]
    ZeroArea { width: u32, height: u32 },

    #[error("displayed size {width}x{height} is not a positive finite size")]
    InvalidDisplaySize { width: f32, height: f32 },

    #[error("source image is empty")]
    EmptySource,
}

/// The output surface could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
}

/// Encoding or delivering the rendered image failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot export an empty surface")]
    EmptySurface,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard rejected the image: {0}")]
    Clipboard(String),
}

/// Umbrella error returned by [`ThumbnailEditor`](crate::ThumbnailEditor).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to decode uploaded image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("upload {0} was superseded by a newer upload")]
    StaleUpload(u64),

    #[error("no upload is waiting for a crop")]
    NoPendingUpload,
}
