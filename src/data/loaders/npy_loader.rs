//! Loader for NumPy `.npy` cube files.

use std::io::Cursor;

use ndarray::{Array3, ArrayD, Axis, Ix2, Ix3};
use ndarray_npy::ReadNpyExt;

use crate::data::loader::{CubeLoader, LoaderError};

/// Loader for NumPy `.npy` files.
///
/// **Expected array shapes**:
/// - 3D `(H, W, B)`: channels-last, as written by `np.save(cube)`
/// - 2D `(H, W)`: single band
///
/// Supported data types: `f64`, `f32`. Both C and Fortran order are accepted.
pub struct NpyLoader;

impl NpyLoader {
    /// NumPy magic bytes: \x93NUMPY
    const MAGIC: &'static [u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

    fn into_cube(array: ArrayD<f64>) -> Result<Array3<f64>, LoaderError> {
        let shape = array.shape().to_vec();
        log::debug!("NpyLoader: array shape = {:?}", shape);

        let cube = match shape.len() {
            2 => array
                .into_dimensionality::<Ix2>()
                .map(|band| band.insert_axis(Axis(2))),
            3 => array.into_dimensionality::<Ix3>(),
            n => {
                return Err(LoaderError::new(format!(
                    "Unsupported array dimensions: {} (expected 2 or 3)",
                    n
                )));
            }
        };

        cube.map_err(|e| LoaderError::new(format!("Failed to reshape {:?}: {}", shape, e)))
    }
}

impl CubeLoader for NpyLoader {
    fn id(&self) -> &'static str {
        "npy"
    }

    fn display_name(&self) -> &'static str {
        "NumPy Array (.npy)"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["npy"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        data.len() >= Self::MAGIC.len() && data.starts_with(Self::MAGIC)
    }

    fn load(&self, data: &[u8], _key: &str) -> Result<Array3<f64>, LoaderError> {
        let mut cursor = Cursor::new(data);

        if let Ok(array) = ArrayD::<f64>::read_npy(&mut cursor) {
            return Self::into_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<f32>::read_npy(&mut cursor) {
            return Self::into_cube(array.mapv(f64::from));
        }

        Err(LoaderError::new(
            "Failed to read NumPy array: unsupported dtype or invalid format",
        ))
    }
}
