/// Configuration, types, and shared structures for clasSCII.
///
/// This crate contains the pixel buffer, character grid, palette and
/// configuration types shared by the sampler, the rasterizer and the CLI.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use charset::Palette;
pub use config::{ConversionConfig, Preset};
pub use error::CoreError;
pub use frame::{AsciiCell, AsciiGrid, Conversion, FrameBuffer};
