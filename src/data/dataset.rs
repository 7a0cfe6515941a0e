//! Indexed access to cube / image pairs.
//!
//! Construction scans the spectral directory once and derives both file name
//! lists. Every `get` reads and decodes its pair from disk again; nothing is
//! cached and no state changes, so a dataset can be shared by reference
//! between worker threads that load different indices.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use rand::Rng;

use crate::config::{DatasetConfig, Split};
use crate::constants::SPECTRAL_BANDS;
use crate::data::loader::CubeLoaderRegistry;
use crate::data::loaders::ImageLoader;
use crate::data::names::{PairList, resolve_names};
use crate::data::transform::{CropWindow, to_chw};
use crate::error::{DatasetError, Result};

/// A fixed-length collection of samples addressed by index.
pub trait Dataset: Send + Sync {
    /// Sample type returned by `get`.
    type Item;

    /// Total number of samples in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the sample at position `index`.
    ///
    /// Fails with `IndexOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Load every sample in index order.
    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter {
            dataset: self,
            index: 0,
        }
    }
}

/// Sequential iterator over a dataset. Yields one `Result` per index.
pub struct DatasetIter<'a, D> {
    dataset: &'a D,
    index: usize,
}

impl<D: Dataset> Iterator for DatasetIter<'_, D> {
    type Item = Result<D::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<D: Dataset> ExactSizeIterator for DatasetIter<'_, D> {}

/// Training sample, both arrays (C × H × W).
#[derive(Debug, Clone)]
pub struct TrainSample {
    /// RGB image, 3 channels
    pub image: Array3<f32>,
    /// Spectral cube
    pub cube: Array3<f32>,
}

impl TrainSample {
    /// `(image, cube)`, image first.
    pub fn into_pair(self) -> (Array3<f32>, Array3<f32>) {
        (self.image, self.cube)
    }
}

/// Validation sample with the scene it came from.
#[derive(Debug, Clone)]
pub struct ValidationSample {
    /// RGB image, 3 channels
    pub image: Array3<f32>,
    /// Spectral cube
    pub cube: Array3<f32>,
    /// Scene identifier, e.g. `ARAD_HS_0451`
    pub name: String,
}

impl ValidationSample {
    /// `(image, cube, name)`.
    pub fn into_tuple(self) -> (Array3<f32>, Array3<f32>, String) {
        (self.image, self.cube, self.name)
    }
}

/// Paired file lists plus the decoders for one split.
struct PairSource {
    split: Split,
    spectral_root: PathBuf,
    image_root: PathBuf,
    pairs: PairList,
    cube_key: String,
    cube_loaders: CubeLoaderRegistry,
    image_loader: ImageLoader,
}

impl PairSource {
    fn open(config: &DatasetConfig, split: Split) -> Result<Self> {
        config.validate()?;

        let (spectral_root, image_root) = config.roots(split);
        let names = resolve_names(&spectral_root, config.layout.name_len)?;
        let pairs = PairList::build(&names, &config.layout);

        log::info!(
            "Opened {} split with {} pairs from {}",
            split.name(),
            pairs.len(),
            spectral_root.display()
        );

        Ok(Self {
            split,
            spectral_root,
            image_root,
            pairs,
            cube_key: config.layout.cube_key.clone(),
            cube_loaders: CubeLoaderRegistry::new(),
            image_loader: ImageLoader::new(config.image_normalization, config.channel_order),
        })
    }

    fn out_of_bounds(&self, index: usize) -> DatasetError {
        DatasetError::IndexOutOfBounds {
            index,
            len: self.pairs.len(),
        }
    }

    /// Decode pair `index` as `(cube, image)`, both (H × W × C).
    fn load(&self, index: usize) -> Result<(Array3<f64>, Array3<f64>)> {
        let (cube_file, image_file) = self
            .pairs
            .cube_file(index)
            .zip(self.pairs.image_file(index))
            .ok_or_else(|| self.out_of_bounds(index))?;

        let cube_path = self.spectral_root.join(cube_file);
        let cube = self
            .cube_loaders
            .load(&read_file(&cube_path)?, Some(cube_file), &self.cube_key)
            .map_err(|source| DatasetError::Decode {
                path: cube_path,
                source,
            })?;

        let image_path = self.image_root.join(image_file);
        let image = self
            .image_loader
            .load(&read_file(&image_path)?)
            .map_err(|source| DatasetError::Decode {
                path: image_path,
                source,
            })?;

        let (cube_h, cube_w, _) = cube.dim();
        let (image_h, image_w, _) = image.dim();
        if (cube_h, cube_w) != (image_h, image_w) {
            return Err(DatasetError::ShapeMismatch {
                cube: (cube_h, cube_w),
                image: (image_h, image_w),
            });
        }

        if cube.dim().2 != SPECTRAL_BANDS {
            log::debug!(
                "{} has {} bands, expected {}",
                cube_file,
                cube.dim().2,
                SPECTRAL_BANDS
            );
        }

        log::trace!(
            "Loaded {} pair {} ({}): {:?} / {:?}",
            self.split.name(),
            index,
            cube_file,
            cube.dim(),
            image.dim()
        );

        Ok((cube, image))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Training pairs, randomly cropped when `crop_size` is positive.
pub struct TrainDataset {
    source: PairSource,
    crop_size: Option<usize>,
}

impl TrainDataset {
    /// Scan the training spectral directory and build the pair lists.
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        Ok(Self {
            source: PairSource::open(config, Split::Train)?,
            crop_size: config.crop_size(),
        })
    }

    /// Load pair `index`, drawing crop offsets from `rng`.
    ///
    /// One window is drawn from the cube's height and width and cut from
    /// both arrays, so they stay pixel aligned.
    pub fn get_with_rng<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<TrainSample> {
        let (cube, image) = self.source.load(index)?;

        let sample = match self.crop_size {
            Some(size) => {
                let (height, width, _) = cube.dim();
                let window = CropWindow::random(height, width, size, rng)?;
                TrainSample {
                    image: to_chw(window.apply(image.view())),
                    cube: to_chw(window.apply(cube.view())),
                }
            }
            None => TrainSample {
                image: to_chw(image.view()),
                cube: to_chw(cube.view()),
            },
        };

        Ok(sample)
    }

    /// Configured crop size, if cropping is enabled.
    pub fn crop_size(&self) -> Option<usize> {
        self.crop_size
    }

    /// File name lists.
    pub fn pairs(&self) -> &PairList {
        &self.source.pairs
    }

    /// Directory the cube files are read from.
    pub fn spectral_root(&self) -> &Path {
        &self.source.spectral_root
    }

    /// Directory the image files are read from.
    pub fn image_root(&self) -> &Path {
        &self.source.image_root
    }
}

impl Dataset for TrainDataset {
    type Item = TrainSample;

    fn len(&self) -> usize {
        self.source.pairs.len()
    }

    fn get(&self, index: usize) -> Result<TrainSample> {
        self.get_with_rng(index, &mut rand::thread_rng())
    }
}

/// Validation pairs at full resolution, tagged with their scene name.
pub struct ValidationDataset {
    source: PairSource,
}

impl ValidationDataset {
    /// Scan the validation spectral directory and build the pair lists.
    ///
    /// `crop_size` is ignored; validation samples are never cropped.
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        if let Some(size) = config.crop_size() {
            log::debug!("Validation split ignores crop_size {}", size);
        }
        Ok(Self {
            source: PairSource::open(config, Split::Validation)?,
        })
    }

    /// File name lists.
    pub fn pairs(&self) -> &PairList {
        &self.source.pairs
    }

    /// Directory the cube files are read from.
    pub fn spectral_root(&self) -> &Path {
        &self.source.spectral_root
    }

    /// Directory the image files are read from.
    pub fn image_root(&self) -> &Path {
        &self.source.image_root
    }
}

impl Dataset for ValidationDataset {
    type Item = ValidationSample;

    fn len(&self) -> usize {
        self.source.pairs.len()
    }

    fn get(&self, index: usize) -> Result<ValidationSample> {
        let (cube, image) = self.source.load(index)?;
        let name = self
            .source
            .pairs
            .identifier(index)
            .ok_or_else(|| self.source.out_of_bounds(index))?
            .to_string();

        Ok(ValidationSample {
            image: to_chw(image.view()),
            cube: to_chw(cube.view()),
            name,
        })
    }
}
