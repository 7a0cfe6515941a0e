//! Dataset configuration.
//!
//! Configuration is read from JSON. Only the two roots are required; every
//! other field falls back to the NTIRE2020 layout:
//!
//! ```json
//! {
//!   "baseroot_train": "/data/ntire2020/train",
//!   "baseroot_val": "/data/ntire2020/val",
//!   "crop_size": 256
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CUBE_EXTENSION, CUBE_KEY, IDENTIFIER_LEN, IMAGE_EXTENSION, IMAGE_SUFFIX, TRAIN_IMAGE_DIR,
    TRAIN_SPECTRAL_DIR, VAL_IMAGE_DIR, VAL_SPECTRAL_DIR,
};

/// Which half of the dataset a loader reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training pairs, randomly cropped when a crop size is set
    Train,
    /// Validation pairs, always full resolution
    Validation,
}

impl Split {
    /// Get the display name for this split.
    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "validation",
        }
    }
}

/// How decoded image samples are scaled into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageNormalization {
    /// Divide by 255 regardless of the decoded bit depth.
    ///
    /// 16-bit images end up far above 1.0 in this mode.
    #[default]
    Fixed8Bit,
    /// Divide by the largest value representable at the decoded bit depth
    BitDepth,
}

/// Channel order of the image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Blue, green, red. Matches models trained on OpenCV-decoded images.
    #[default]
    Bgr,
    /// Red, green, blue
    Rgb,
}

/// File naming and directory layout of a paired dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Spectral cube directory inside `baseroot_train`
    #[serde(default = "default_train_spectral_dir")]
    pub train_spectral_dir: String,

    /// RGB image directory inside `baseroot_train`
    #[serde(default = "default_train_image_dir")]
    pub train_image_dir: String,

    /// Spectral cube directory inside `baseroot_val`
    #[serde(default = "default_val_spectral_dir")]
    pub val_spectral_dir: String,

    /// RGB image directory inside `baseroot_val`
    #[serde(default = "default_val_image_dir")]
    pub val_image_dir: String,

    /// Number of leading file name characters forming the identifier
    #[serde(default = "default_name_len")]
    pub name_len: usize,

    /// Cube file extension, without the dot
    #[serde(default = "default_cube_ext")]
    pub cube_ext: String,

    /// Variable name of the cube inside a MAT file
    #[serde(default = "default_cube_key")]
    pub cube_key: String,

    /// Suffix between identifier and extension of image files
    #[serde(default = "default_image_suffix")]
    pub image_suffix: String,

    /// Image file extension, without the dot
    #[serde(default = "default_image_ext")]
    pub image_ext: String,
}

fn default_train_spectral_dir() -> String {
    TRAIN_SPECTRAL_DIR.to_string()
}

fn default_train_image_dir() -> String {
    TRAIN_IMAGE_DIR.to_string()
}

fn default_val_spectral_dir() -> String {
    VAL_SPECTRAL_DIR.to_string()
}

fn default_val_image_dir() -> String {
    VAL_IMAGE_DIR.to_string()
}

fn default_name_len() -> usize {
    IDENTIFIER_LEN
}

fn default_cube_ext() -> String {
    CUBE_EXTENSION.to_string()
}

fn default_cube_key() -> String {
    CUBE_KEY.to_string()
}

fn default_image_suffix() -> String {
    IMAGE_SUFFIX.to_string()
}

fn default_image_ext() -> String {
    IMAGE_EXTENSION.to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            train_spectral_dir: default_train_spectral_dir(),
            train_image_dir: default_train_image_dir(),
            val_spectral_dir: default_val_spectral_dir(),
            val_image_dir: default_val_image_dir(),
            name_len: default_name_len(),
            cube_ext: default_cube_ext(),
            cube_key: default_cube_key(),
            image_suffix: default_image_suffix(),
            image_ext: default_image_ext(),
        }
    }
}

impl LayoutConfig {
    /// Subdirectory names `(spectral, image)` for a split.
    pub fn dirs(&self, split: Split) -> (&str, &str) {
        match split {
            Split::Train => (self.train_spectral_dir.as_str(), self.train_image_dir.as_str()),
            Split::Validation => (self.val_spectral_dir.as_str(), self.val_image_dir.as_str()),
        }
    }
}

/// Configuration shared by the training and validation loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Root holding the training spectral and image directories
    pub baseroot_train: PathBuf,

    /// Root holding the validation spectral and image directories
    pub baseroot_val: PathBuf,

    /// Side length of the random training crop; zero or negative disables it
    #[serde(default)]
    pub crop_size: i64,

    /// Directory and file naming
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Image sample scaling
    #[serde(default)]
    pub image_normalization: ImageNormalization,

    /// Image channel order
    #[serde(default)]
    pub channel_order: ChannelOrder,
}

impl DatasetConfig {
    /// Create a configuration with the default layout and cropping disabled.
    pub fn new(baseroot_train: impl Into<PathBuf>, baseroot_val: impl Into<PathBuf>) -> Self {
        Self {
            baseroot_train: baseroot_train.into(),
            baseroot_val: baseroot_val.into(),
            crop_size: 0,
            layout: LayoutConfig::default(),
            image_normalization: ImageNormalization::default(),
            channel_order: ChannelOrder::default(),
        }
    }

    /// Set the training crop size.
    pub fn with_crop_size(mut self, crop_size: i64) -> Self {
        self.crop_size = crop_size;
        self
    }

    /// Replace the directory layout.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the image normalization mode.
    pub fn with_image_normalization(mut self, normalization: ImageNormalization) -> Self {
        self.image_normalization = normalization;
        self
    }

    /// Set the image channel order.
    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    /// Crop size if cropping is enabled.
    pub fn crop_size(&self) -> Option<usize> {
        usize::try_from(self.crop_size).ok().filter(|&size| size > 0)
    }

    /// `(spectral_root, image_root)` for a split.
    pub fn roots(&self, split: Split) -> (PathBuf, PathBuf) {
        let base = match split {
            Split::Train => &self.baseroot_train,
            Split::Validation => &self.baseroot_val,
        };
        let (spectral, image) = self.layout.dirs(split);
        (base.join(spectral), base.join(image))
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.name_len == 0 {
            return Err(ConfigError::Invalid {
                reason: "name_len must be at least 1".to_string(),
            });
        }
        if layout.cube_ext.is_empty() || layout.image_ext.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "file extensions must not be empty".to_string(),
            });
        }
        if layout.cube_key.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "cube_key must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded dataset configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the loaders cannot work with
    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}
