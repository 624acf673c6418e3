use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is recoverable at the boundary between the engine and its
/// caller: none of them aborts the process.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The source image could not be loaded or decoded.
    #[error("Impossible de charger l'image {source_name} : {reason}")]
    ImageAcquisition {
        /// File path or label of the source.
        source_name: String,
        /// Underlying decoder or I/O message.
        reason: String,
    },

    /// Decoded image has a zero width or height.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidImage {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel data could not be read from the decoded image.
    #[error("Lecture des pixels impossible : {0}")]
    PixelAccess(String),

    /// No conversion result is available for export.
    #[error("Export impossible : {0}")]
    Export(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
