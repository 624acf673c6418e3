/// Output side of clasSCII: raster preview and text export.

pub mod rasterizer;
pub mod surface;
pub mod text;

pub use rasterizer::Rasterizer;
