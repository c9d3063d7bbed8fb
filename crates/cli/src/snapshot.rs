//! PNG output of the software framebuffer.

use crate::error::CliError;
use std::path::Path;
use swatch_core::SoftwareBackend;

/// Writes the backend's current frame as a PNG.
///
/// Returns `CliError::Io` on a buffer size mismatch or write failure.
pub fn write_png(backend: &SoftwareBackend, path: &Path) -> Result<(), CliError> {
    let size = backend.size();
    let img = image::RgbaImage::from_raw(size.width, size.height, backend.to_rgba8())
        .ok_or_else(|| CliError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)?;
    Ok(())
}
