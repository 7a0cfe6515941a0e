//! Built-in sample decoders.
//!
//! `MatLoader` and `NpyLoader` implement the `CubeLoader` trait for spectral
//! cubes. `ImageLoader` decodes the companion RGB image.

mod image_loader;
mod mat_loader;
mod npy_loader;

pub use image_loader::ImageLoader;
pub use mat_loader::MatLoader;
pub use npy_loader::NpyLoader;
