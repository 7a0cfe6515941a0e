//! Trait-based spectral cube loading.
//!
//! Cube files come in more than one container. Each container implements
//! `CubeLoader`; the registry picks one by extension or magic bytes.
//!
//! ## Supported Formats
//!
//! - **MAT v5**: `.mat` files holding a named (H × W × C) variable
//! - **NumPy Arrays**: `.npy` files holding an (H × W × C) array
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hs_pairs::data::CubeLoaderRegistry;
//!
//! let registry = CubeLoaderRegistry::new();
//! let cube = registry.load(&bytes, Some("ARAD_HS_0001.mat"), "cube")?;
//! ```

use ndarray::Array3;

/// Error type for loader operations.
#[derive(Debug, Clone)]
pub struct LoaderError {
    /// Human-readable error message.
    pub message: String,
    /// The loader that produced this error (if known).
    pub loader_id: Option<&'static str>,
}

impl LoaderError {
    /// Create a new loader error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            loader_id: None,
        }
    }

    /// Create an error with loader context.
    pub fn with_loader(mut self, loader_id: &'static str) -> Self {
        self.loader_id = Some(loader_id);
        self
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loader) = self.loader_id {
            write!(f, "[{}] {}", loader, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<String> for LoaderError {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for LoaderError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Trait for spectral cube container loaders.
pub trait CubeLoader: Send + Sync {
    /// Unique identifier for this loader (e.g., "mat", "npy").
    fn id(&self) -> &'static str;

    /// Human-readable name for log output.
    fn display_name(&self) -> &'static str;

    /// File extensions this loader handles (lowercase, without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Check if this loader can handle the given data.
    ///
    /// Implementations should check magic bytes or headers.
    fn can_load(&self, data: &[u8]) -> bool;

    /// Decode a cube from raw file bytes.
    ///
    /// `key` names the variable to read for containers holding several.
    /// The result is laid out (height, width, bands).
    fn load(&self, data: &[u8], key: &str) -> Result<Array3<f64>, LoaderError>;

    /// Priority for format detection (higher = checked first).
    fn priority(&self) -> i32 {
        0
    }
}

/// Registry of available cube loaders.
pub struct CubeLoaderRegistry {
    loaders: Vec<Box<dyn CubeLoader>>,
}

impl CubeLoaderRegistry {
    /// Create a new registry with all built-in loaders.
    pub fn new() -> Self {
        let mut registry = Self {
            loaders: Vec::new(),
        };

        registry.register(Box::new(super::loaders::MatLoader));
        registry.register(Box::new(super::loaders::NpyLoader));

        registry
    }

    /// Register a new loader.
    pub fn register(&mut self, loader: Box<dyn CubeLoader>) {
        self.loaders.push(loader);
        self.loaders.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    fn loaders_for_extension(&self, ext: &str) -> Vec<&dyn CubeLoader> {
        let ext_lower = ext.to_lowercase();
        self.loaders
            .iter()
            .filter(|l| l.extensions().iter().any(|e| *e == ext_lower))
            .map(|l| l.as_ref())
            .collect()
    }

    fn detect_loader(&self, data: &[u8]) -> Option<&dyn CubeLoader> {
        self.loaders
            .iter()
            .find(|l| l.can_load(data))
            .map(|l| l.as_ref())
    }

    /// Load a cube, auto-detecting the container.
    ///
    /// Tries loaders in this order:
    /// 1. By file extension (if filename provided)
    /// 2. By magic byte detection
    ///
    /// The error of the first loader that claimed the file is returned, so a
    /// MAT file with a missing variable reports that rather than a generic
    /// detection failure.
    pub fn load(
        &self,
        data: &[u8],
        filename: Option<&str>,
        key: &str,
    ) -> Result<Array3<f64>, LoaderError> {
        let extension = filename.and_then(|f| f.rsplit_once('.').map(|(_, e)| e.to_lowercase()));
        let mut first_error = None;

        if let Some(ref ext) = extension {
            for loader in self.loaders_for_extension(ext) {
                match loader.load(data, key) {
                    Ok(cube) => {
                        log::debug!(
                            "Loaded cube with {} loader (by extension)",
                            loader.display_name()
                        );
                        return Ok(cube);
                    }
                    Err(e) => {
                        log::trace!("Loader {} failed: {}", loader.id(), e);
                        if first_error.is_none() {
                            first_error = Some(e.with_loader(loader.id()));
                        }
                    }
                }
            }
        }

        if let Some(loader) = self.detect_loader(data) {
            match loader.load(data, key) {
                Ok(cube) => {
                    log::debug!(
                        "Loaded cube with {} loader (by detection)",
                        loader.display_name()
                    );
                    return Ok(cube);
                }
                Err(e) => {
                    log::trace!("Detected loader {} failed: {}", loader.id(), e);
                    if first_error.is_none() {
                        first_error = Some(e.with_loader(loader.id()));
                    }
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            LoaderError::new(format!(
                "No cube loader could handle the data{}",
                filename
                    .map(|f| format!(" (file: {})", f))
                    .unwrap_or_default()
            ))
        }))
    }
}

impl Default for CubeLoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::tests::fixtures::{mat_v5_bytes, npy_bytes};

    #[test]
    fn test_loaders_sorted_by_priority() {
        let registry = CubeLoaderRegistry::new();
        let ids: Vec<_> = registry.loaders.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["mat", "npy"]);
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let registry = CubeLoaderRegistry::new();
        let cube = Array3::from_elem((2, 2, 1), 0.5);

        let loaded = registry
            .load(&mat_v5_bytes("cube", &cube), Some("SCENE.MAT"), "cube")
            .unwrap();
        assert_eq!(loaded, cube);
    }

    #[test]
    fn test_detection_when_extension_is_wrong() {
        let registry = CubeLoaderRegistry::new();
        let cube = Array3::from_elem((2, 3, 2), 0.25);

        let loaded = registry
            .load(&npy_bytes(&cube), Some("scene.mat"), "cube")
            .unwrap();
        assert_eq!(loaded, cube);

        let loaded = registry.load(&npy_bytes(&cube), None, "cube").unwrap();
        assert_eq!(loaded.dim(), (2, 3, 2));
    }

    #[test]
    fn test_garbage_reports_filename() {
        let registry = CubeLoaderRegistry::new();
        let err = registry
            .load(&[0u8; 16], Some("scene.bin"), "cube")
            .unwrap_err();
        assert!(err.message.contains("scene.bin"), "got: {}", err);
    }

    #[test]
    fn test_extension_error_carries_loader_id() {
        let registry = CubeLoaderRegistry::new();
        let err = registry
            .load(b"not a mat file", Some("scene.mat"), "cube")
            .unwrap_err();
        assert_eq!(err.loader_id, Some("mat"));
    }
}
