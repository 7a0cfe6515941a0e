//! Paired RGB / hyperspectral sample loading.
//!
//! This module provides:
//! - `resolve_names` / `PairList`: scene identifiers and the file names
//!   derived from them
//! - `CubeLoaderRegistry`: extensible decoding of spectral cube containers
//! - `ImageLoader`: decoding of the companion RGB image
//! - `TrainDataset` / `ValidationDataset`: indexed access to decoded pairs
//!
//! ## Adding New Cube Formats
//!
//! To add support for a new container (e.g., ENVI, HDF5):
//!
//! 1. Create a new loader in `loaders/` implementing `CubeLoader`
//! 2. Register it in `CubeLoaderRegistry::new()`
//!
//! ```rust,ignore
//! use hs_pairs::data::{CubeLoader, LoaderError};
//! use ndarray::Array3;
//!
//! pub struct MyFormatLoader;
//!
//! impl CubeLoader for MyFormatLoader {
//!     fn id(&self) -> &'static str { "myformat" }
//!     fn display_name(&self) -> &'static str { "My Format" }
//!     fn extensions(&self) -> &'static [&'static str] { &["myf"] }
//!     fn can_load(&self, data: &[u8]) -> bool { /* check magic bytes */ }
//!     fn load(&self, data: &[u8], key: &str) -> Result<Array3<f64>, LoaderError> { /* ... */ }
//! }
//! ```

mod dataset;
mod loader;
pub mod loaders;
mod names;
mod transform;

#[cfg(test)]
mod tests;

pub use dataset::{
    Dataset, DatasetIter, TrainDataset, TrainSample, ValidationDataset, ValidationSample,
};
pub use loader::{CubeLoader, CubeLoaderRegistry, LoaderError};
pub use names::{PairList, resolve_names};
pub use transform::{CropWindow, to_chw};
