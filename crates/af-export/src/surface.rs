use std::path::Path;

use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use anyhow::{Context, Result};
use image::RgbaImage;

/// Encode la surface rasterisée en PNG.
///
/// # Errors
/// `CoreError::Export` for an empty surface, otherwise any encoding or I/O
/// failure with the target path as context.
///
/// # Example
/// ```no_run
/// use af_core::frame::FrameBuffer;
/// use af_export::surface::save_png;
/// save_png(&FrameBuffer::new(8, 8), std::path::Path::new("preview.png")).unwrap();
/// ```
pub fn save_png(surface: &FrameBuffer, path: &Path) -> Result<()> {
    if surface.width == 0 || surface.height == 0 {
        return Err(CoreError::Export("surface vide, rien à enregistrer".into()).into());
    }
    let img = RgbaImage::from_raw(surface.width, surface.height, surface.data.clone())
        .context("Buffer de surface incohérent avec ses dimensions")?;
    img.save(path)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Aperçu {}×{} écrit dans {}",
        surface.width,
        surface.height,
        path.display()
    );
    Ok(())
}
