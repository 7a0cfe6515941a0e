//! hs_pairs - paired RGB / hyperspectral dataset loading
//!
//! Enumerates scenes of an NTIRE2020-style spectral reconstruction dataset,
//! decodes each RGB image together with its hyperspectral cube and hands
//! both back as channel-first `f32` arrays ready for a training loop.
//!
//! ```rust,ignore
//! use hs_pairs::{Dataset, DatasetConfig, TrainDataset};
//!
//! let config = DatasetConfig::new("/data/train", "/data/val").with_crop_size(256);
//! let train = TrainDataset::new(&config)?;
//! let (image, cube) = train.get(0)?.into_pair(); // (3, 256, 256), (31, 256, 256)
//! ```

pub mod config;
pub mod constants;
pub mod data;
pub mod error;

pub use config::{
    ChannelOrder, ConfigError, DatasetConfig, ImageNormalization, LayoutConfig, Split,
};
pub use data::{Dataset, TrainDataset, TrainSample, ValidationDataset, ValidationSample};
pub use error::{DatasetError, Result};
