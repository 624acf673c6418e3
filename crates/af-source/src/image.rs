use std::io::Read;
use std::path::Path;

use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use image::DynamicImage;

/// Label used in logs and errors for the built-in picture.
pub const DEFAULT_IMAGE_NAME: &str = "default";

/// Charge une image depuis le disque en RGBA.
///
/// # Errors
/// `ImageAcquisition` if the file is unreadable or not a supported image,
/// `InvalidImage` if it decodes to a zero-area picture.
///
/// # Example
/// ```no_run
/// use af_source::image::load_image;
/// use std::io::Read;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer, CoreError> {
    let img = image::open(path).map_err(|e| CoreError::ImageAcquisition {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let frame = into_frame(img)?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

/// Décode une image déjà en mémoire (contenu glissé-déposé, téléchargement…).
///
/// # Errors
/// Same as [`load_image`]; `label` names the payload in the error.
pub fn decode_image(bytes: &[u8], label: &str) -> Result<FrameBuffer, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::ImageAcquisition {
            source_name: label.to_string(),
            reason: "contenu vide".to_string(),
        });
    }
    let img = image::load_from_memory(bytes).map_err(|e| CoreError::ImageAcquisition {
        source_name: label.to_string(),
        reason: e.to_string(),
    })?;
    into_frame(img)
}

/// Lit un flux complet (stdin, pipe…) puis le décode comme [`decode_image`].
///
/// # Errors
/// `ImageAcquisition` if the stream cannot be read, otherwise as [`decode_image`].
pub fn read_image(mut reader: impl Read, label: &str) -> Result<FrameBuffer, CoreError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| CoreError::ImageAcquisition {
            source_name: label.to_string(),
            reason: e.to_string(),
        })?;
    let frame = decode_image(&bytes, label)?;
    log::info!(
        "Image lue depuis {label} : {} octets ({}×{})",
        bytes.len(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

fn into_frame(img: DynamicImage) -> Result<FrameBuffer, CoreError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let frame = FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    };
    frame.ensure_readable()?;
    Ok(frame)
}

/// Image par défaut quand aucune source n'est fournie.
///
/// Dégradé diagonal avec un disque clair centré, 320×240.
///
/// # Example
/// ```
/// use af_source::image::default_image;
/// let frame = default_image();
/// assert_eq!((frame.width, frame.height), (320, 240));
/// ```
#[must_use]
pub fn default_image() -> FrameBuffer {
    const W: u32 = 320;
    const H: u32 = 240;
    let mut frame = FrameBuffer::new(W, H);
    let (cx, cy) = (W as f32 / 2.0, H as f32 / 2.0);
    let radius = H as f32 * 0.3;

    for y in 0..H {
        for x in 0..W {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let rgba = if dist < radius {
                let shade = 255.0 - (dist / radius) * 80.0;
                [shade as u8, (shade * 0.9) as u8, (shade * 0.6) as u8, 255]
            } else {
                let r = (x * 255 / W) as u8;
                let b = (y * 255 / H) as u8;
                [r / 2, 30, b, 255]
            };
            frame.put_pixel(x, y, rgba);
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn loads_png_as_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("px.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), (10, 20, 30, 255));
    }

    #[test]
    fn missing_file_is_acquisition_error() {
        let err = load_image(Path::new("/nonexistent/none.png")).unwrap_err();
        assert!(matches!(err, CoreError::ImageAcquisition { .. }));
    }

    #[test]
    fn garbage_bytes_are_acquisition_error() {
        let err = decode_image(b"definitely not a png", "drop").unwrap_err();
        match err {
            CoreError::ImageAcquisition { source_name, .. } => assert_eq!(source_name, "drop"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(decode_image(&[], "drop").is_err());
    }

    #[test]
    fn reads_encoded_stream() {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(4, 1, Rgba([200, 0, 50, 255]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let frame = read_image(bytes.as_slice(), "stdin").unwrap();
        assert_eq!((frame.width, frame.height), (4, 1));
        assert_eq!(frame.pixel(3, 0), (200, 0, 50, 255));

        let err = read_image(std::io::empty(), "stdin").unwrap_err();
        assert!(matches!(err, CoreError::ImageAcquisition { .. }));
    }

    #[test]
    fn default_image_is_readable_and_not_uniform() {
        let frame = default_image();
        assert!(frame.ensure_readable().is_ok());
        assert_ne!(frame.pixel(0, 0), frame.pixel(160, 120));
    }
}
