//! Global constants for the paired dataset layout

/// Spectral cube directory inside the training root
pub const TRAIN_SPECTRAL_DIR: &str = "NTIRE2020_Train_Spectral";

/// RGB image directory inside the training root
pub const TRAIN_IMAGE_DIR: &str = "NTIRE2020_Train_RealWorld";

/// Spectral cube directory inside the validation root
pub const VAL_SPECTRAL_DIR: &str = "NTIRE2020_Validation_Spectral";

/// RGB image directory inside the validation root
pub const VAL_IMAGE_DIR: &str = "NTIRE2020_Validation_RealWorld";

/// Length of a scene identifier, e.g. `ARAD_HS_0001`
pub const IDENTIFIER_LEN: usize = 12;

/// Extension of spectral cube files
pub const CUBE_EXTENSION: &str = "mat";

/// Variable holding the cube inside a MAT file
pub const CUBE_KEY: &str = "cube";

/// Suffix appended to the identifier for the companion RGB image
pub const IMAGE_SUFFIX: &str = "_RealWorld";

/// Extension of companion RGB image files
pub const IMAGE_EXTENSION: &str = "jpg";

/// Number of spectral bands in an NTIRE2020 cube
pub const SPECTRAL_BANDS: usize = 31;

/// Number of channels expected in a companion image
pub const IMAGE_CHANNELS: usize = 3;

/// Largest 8-bit sample value
pub const MAX_8BIT: f64 = 255.0;

/// Largest 16-bit sample value
pub const MAX_16BIT: f64 = 65535.0;
