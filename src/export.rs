//! PNG export for downloads and the clipboard.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tempfile::NamedTempFile;

use crate::bitmap::RenderedBitmap;
use crate::error::ExportError;

/// File name used for downloads.
pub const DEFAULT_FILE_NAME: &str = "thumbnail.png";

/// MIME type of the clipboard payload.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Encodes the bitmap as PNG.
///
/// The bytes are a snapshot: later renders never change them.
pub fn to_png_bytes(bitmap: &RenderedBitmap) -> Result<Vec<u8>, ExportError> {
    if bitmap.is_empty() {
        return Err(ExportError::EmptySurface);
    }

    let mut png_bytes = Vec::new();
    bitmap
        .data
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;

    tracing::debug!(bytes = png_bytes.len(), "encoded PNG");
    Ok(png_bytes)
}

// ============================================================================
// Download
// ============================================================================

/// A finished file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the artifact into `dir` and returns the full path.
    ///
    /// The bytes go to a uniquely named temporary file in `dir` that is
    /// renamed into place once complete. The temporary file is removed on any
    /// failure, so `dir` never holds a truncated image.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        let path = dir.join(&self.file_name);

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&self.bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|err| err.error)?;

        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "saved thumbnail");
        Ok(path)
    }
}

/// Encodes the bitmap as a `thumbnail.png` download.
pub fn download_artifact(bitmap: &RenderedBitmap) -> Result<ExportArtifact, ExportError> {
    Ok(ExportArtifact {
        file_name: DEFAULT_FILE_NAME.to_string(),
        bytes: to_png_bytes(bitmap)?,
    })
}

// ============================================================================
// Clipboard
// ============================================================================

/// A PNG-typed clipboard payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Encodes the bitmap into a payload the host clipboard can accept.
pub fn to_png_blob_handle(bitmap: &RenderedBitmap) -> Result<ClipboardPayload, ExportError> {
    Ok(ClipboardPayload {
        mime_type: PNG_MIME_TYPE,
        bytes: to_png_bytes(bitmap)?,
    })
}

/// The host's clipboard.
pub trait ClipboardSink {
    /// Writes a single payload, replacing the clipboard contents.
    fn write(&mut self, payload: ClipboardPayload) -> Result<(), ExportError>;
}

/// Outcome of a copy, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardNotice {
    Copied,
    Failed(String),
}

impl ClipboardNotice {
    pub fn is_success(&self) -> bool {
        matches!(self, ClipboardNotice::Copied)
    }

    pub fn message(&self) -> &'static str {
        match self {
            ClipboardNotice::Copied => "Image copied to clipboard!",
            ClipboardNotice::Failed(_) => "Failed to copy image to clipboard",
        }
    }
}

/// Encodes the bitmap and writes it to `sink`.
pub fn copy_to_clipboard(
    bitmap: &RenderedBitmap,
    sink: &mut impl ClipboardSink,
) -> ClipboardNotice {
    match to_png_blob_handle(bitmap).and_then(|payload| sink.write(payload)) {
        Ok(()) => ClipboardNotice::Copied,
        Err(err) => {
            tracing::warn!(%err, "failed to copy image to clipboard");
            ClipboardNotice::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn bitmap(width: u32, height: u32) -> RenderedBitmap {
        RenderedBitmap::new(RgbaImage::from_pixel(width, height, Rgba([12, 34, 56, 255])))
    }

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<ClipboardPayload>,
    }

    impl ClipboardSink for MemoryClipboard {
        fn write(&mut self, payload: ClipboardPayload) -> Result<(), ExportError> {
            self.contents = Some(payload);
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl ClipboardSink for DeniedClipboard {
        fn write(&mut self, _payload: ClipboardPayload) -> Result<(), ExportError> {
            Err(ExportError::Clipboard("permission denied".into()))
        }
    }

    #[test]
    fn png_bytes_decode_to_same_size() {
        let bytes = to_png_bytes(&bitmap(1200, 1200)).unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 1200));
        assert_eq!(decoded.to_rgba8().get_pixel(5, 5).0, [12, 34, 56, 255]);
    }

    #[test]
    fn empty_surface_is_rejected() {
        let result = to_png_bytes(&RenderedBitmap::new(RgbaImage::new(0, 0)));
        assert!(matches!(result, Err(ExportError::EmptySurface)));
        assert!(download_artifact(&RenderedBitmap::new(RgbaImage::new(10, 0))).is_err());
    }

    #[test]
    fn download_uses_default_name() {
        let artifact = download_artifact(&bitmap(4, 4)).unwrap();
        assert_eq!(artifact.file_name, "thumbnail.png");
        assert!(!artifact.bytes.is_empty());
    }

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn artifact_written_to_dir() {
        let dir = TempDir::new().unwrap();

        let artifact = download_artifact(&bitmap(3, 2)).unwrap();
        let path = artifact.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("thumbnail.png"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
        assert_eq!(entry_names(dir.path()), vec!["thumbnail.png"]);
    }

    #[test]
    fn artifact_overwrites_previous_download() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("thumbnail.png"), b"stale").unwrap();

        let artifact = download_artifact(&bitmap(5, 5)).unwrap();
        let path = artifact.write_to_dir(dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
        assert_eq!(entry_names(dir.path()), vec!["thumbnail.png"]);
    }

    #[test]
    fn failed_write_leaves_no_stray_file() {
        let dir = TempDir::new().unwrap();
        // A directory in the way makes the final rename fail.
        std::fs::create_dir(dir.path().join("thumbnail.png")).unwrap();

        let artifact = download_artifact(&bitmap(3, 2)).unwrap();
        let result = artifact.write_to_dir(dir.path());
        assert!(matches!(result, Err(ExportError::Io(_))));

        assert_eq!(entry_names(dir.path()), vec!["thumbnail.png"]);
        assert!(dir.path().join("thumbnail.png").is_dir());
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let artifact = download_artifact(&bitmap(2, 2)).unwrap();
        let result = artifact.write_to_dir(dir.path().join("absent"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn clipboard_receives_png_payload() {
        let mut clipboard = MemoryClipboard::default();
        let notice = copy_to_clipboard(&bitmap(8, 8), &mut clipboard);
        assert!(notice.is_success());
        assert_eq!(notice.message(), "Image copied to clipboard!");

        let payload = clipboard.contents.unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.bytes, to_png_bytes(&bitmap(8, 8)).unwrap());
    }

    #[test]
    fn clipboard_failure_becomes_notice() {
        let notice = copy_to_clipboard(&bitmap(8, 8), &mut DeniedClipboard);
        assert!(!notice.is_success());
        assert_eq!(notice.message(), "Failed to copy image to clipboard");
        assert!(matches!(
            notice,
            ClipboardNotice::Failed(reason) if reason.contains("permission denied")
        ));

        let mut clipboard = MemoryClipboard::default();
        let notice = copy_to_clipboard(&RenderedBitmap::new(RgbaImage::new(0, 0)), &mut clipboard);
        assert!(!notice.is_success());
        assert!(clipboard.contents.is_none());
    }
}
