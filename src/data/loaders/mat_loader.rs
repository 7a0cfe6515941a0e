//! Loader for MATLAB `.mat` cube files.
//!
//! Reads MAT v5 containers (compressed or not). MATLAB stores arrays in
//! column-major order; the returned cube is indexed `[row, column, band]`
//! regardless of the storage order.

use std::io::Cursor;

use matfile::{MatFile, NumericData};
use ndarray::{Array3, ShapeBuilder};

use crate::data::loader::{CubeLoader, LoaderError};

/// Loader for MAT v5 files.
///
/// **Expected variable shapes**:
/// - 3D `(H, W, B)`: one band per trailing index
/// - 2D `(H, W)`: single band; MATLAB drops trailing singleton dimensions
///
/// Supported classes: `double`, `single`. Values are passed through
/// unchanged, since cubes are stored already normalized.
pub struct MatLoader;

impl MatLoader {
    /// Every MAT header opens with this text.
    const MAGIC: &'static [u8] = b"MATLAB";

    /// v7.3 files are HDF5 containers behind a MAT-style text header.
    const HDF5_MARKER: &'static [u8] = b"MATLAB 7.3";

    fn variable_names(mat: &MatFile) -> String {
        mat.arrays()
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl CubeLoader for MatLoader {
    fn id(&self) -> &'static str {
        "mat"
    }

    fn display_name(&self) -> &'static str {
        "MATLAB Array (.mat)"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["mat"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        data.len() >= 128 && data.starts_with(Self::MAGIC)
    }

    fn load(&self, data: &[u8], key: &str) -> Result<Array3<f64>, LoaderError> {
        if data.starts_with(Self::HDF5_MARKER) {
            return Err(LoaderError::new(
                "MAT v7.3 (HDF5) files are not supported, re-save with '-v7'",
            ));
        }

        let mat = MatFile::parse(Cursor::new(data))
            .map_err(|e| LoaderError::new(format!("Failed to parse MAT file: {:?}", e)))?;

        let array = mat.find_by_name(key).ok_or_else(|| {
            LoaderError::new(format!(
                "Variable '{}' not found (available: {})",
                key,
                Self::variable_names(&mat)
            ))
        })?;

        let (height, width, bands) = match &array.size()[..] {
            [h, w] => (*h, *w, 1),
            [h, w, b] => (*h, *w, *b),
            dims => {
                return Err(LoaderError::new(format!(
                    "Variable '{}' has {} dimensions (expected 2 or 3)",
                    key,
                    dims.len()
                )));
            }
        };

        let values: Vec<f64> = match array.data() {
            NumericData::Double { real, .. } => real.clone(),
            NumericData::Single { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
            _ => {
                return Err(LoaderError::new(format!(
                    "Variable '{}' is not a floating point array",
                    key
                )));
            }
        };

        log::debug!(
            "MatLoader: '{}' is {}x{} with {} bands",
            key,
            height,
            width,
            bands
        );

        Array3::from_shape_vec((height, width, bands).f(), values)
            .map_err(|e| LoaderError::new(format!("Variable '{}' has inconsistent size: {}", key, e)))
    }

    fn priority(&self) -> i32 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::fixtures::{MatClass, mat_v5_bytes, mat_v5_variable};

    #[test]
    fn test_loader_metadata() {
        let loader = MatLoader;
        assert_eq!(loader.id(), "mat");
        assert!(loader.extensions().contains(&"mat"));
        assert_eq!(loader.priority(), 10);
    }

    #[test]
    fn test_magic_detection() {
        let loader = MatLoader;
        let cube = Array3::<f64>::zeros((2, 2, 2));
        assert!(loader.can_load(&mat_v5_bytes("cube", &cube)));

        let npy_magic = [0x93, b'N', b'U', b'M', b'P', b'Y', 0x01, 0x00];
        assert!(!loader.can_load(&npy_magic));
    }

    #[test]
    fn test_column_major_order_restored() {
        let cube = Array3::from_shape_fn((3, 4, 2), |(y, x, b)| (y * 100 + x * 10 + b) as f64);
        let bytes = mat_v5_bytes("cube", &cube);

        let loaded = MatLoader.load(&bytes, "cube").unwrap();
        assert_eq!(loaded.dim(), (3, 4, 2));
        assert_eq!(loaded[[2, 3, 1]], 231.0);
        assert_eq!(loaded, cube);
    }

    #[test]
    fn test_single_precision_widened() {
        // 2 x 2 x 2, column-major
        let values = [0.5, 0.25, 0.125, 1.0, 2.0, 4.0, 8.0, 16.0];
        let bytes = mat_v5_variable("cube", MatClass::Single, &[2, 2, 2], &values);

        let loaded = MatLoader.load(&bytes, "cube").unwrap();
        assert_eq!(loaded.dim(), (2, 2, 2));
        assert_eq!(loaded[[1, 0, 0]], 0.25);
        assert_eq!(loaded[[0, 1, 0]], 0.125);
        assert_eq!(loaded[[1, 1, 1]], 16.0);
    }

    #[test]
    fn test_two_dimensional_variable_is_single_band() {
        // 2 x 3, column-major
        let values = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        let bytes = mat_v5_variable("cube", MatClass::Double, &[2, 3], &values);

        let loaded = MatLoader.load(&bytes, "cube").unwrap();
        assert_eq!(loaded.dim(), (2, 3, 1));
        assert_eq!(loaded[[0, 2, 0]], 3.0);
        assert_eq!(loaded[[1, 0, 0]], 4.0);
    }

    #[test]
    fn test_missing_variable_lists_available() {
        let cube = Array3::<f64>::zeros((2, 2, 2));
        let bytes = mat_v5_bytes("rad", &cube);

        let err = MatLoader.load(&bytes, "cube").unwrap_err();
        assert!(err.message.contains("'cube' not found"), "got: {}", err);
        assert!(err.message.contains("rad"), "got: {}", err);
    }

    #[test]
    fn test_hdf5_container_rejected() {
        let mut header = b"MATLAB 7.3 MAT-file, Platform: GLNXA64, HDF5 schema 1.00 .".to_vec();
        header.resize(512, b' ');

        let err = MatLoader.load(&header, "cube").unwrap_err();
        assert!(err.message.contains("v7.3"), "got: {}", err);
    }
}
