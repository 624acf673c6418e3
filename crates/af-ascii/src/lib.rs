/// ASCII conversion engine for clasSCII.
///
/// Samples a pixel frame on a coarse grid and maps each sample to a
/// palette character and an optional colour.
pub mod color_map;
pub mod luminance;
pub mod sampler;

pub use sampler::convert;
