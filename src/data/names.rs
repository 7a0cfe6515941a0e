//! Scene identifiers and the paired file name lists derived from them.

use std::collections::HashSet;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::LayoutConfig;
use crate::error::{DatasetError, Result};

/// Collect the identifier of every file below `root`.
///
/// Each file name is cut to its first `name_len` characters. Nothing is
/// deduplicated: a directory holding two files with the same prefix yields
/// that identifier twice. Entries are visited in file name order within each
/// directory so repeated scans agree.
///
/// Symlinks count as files unless they point at a directory, and linked
/// directories are not descended into. Names that are not valid UTF-8 cannot
/// be mapped to a companion image and are skipped with a warning.
pub fn resolve_names(root: &Path, name_len: usize) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DatasetError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !is_file_like(&entry) {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            log::warn!("Skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };
        names.push(file_name.chars().take(name_len).collect());
    }

    let mut seen = HashSet::with_capacity(names.len());
    let duplicates = names.iter().filter(|n| !seen.insert(n.as_str())).count();
    if duplicates > 0 {
        log::warn!(
            "{} repeated identifiers under {}, each repeat is kept as its own sample",
            duplicates,
            root.display()
        );
    }

    log::debug!("Resolved {} identifiers under {}", names.len(), root.display());
    Ok(names)
}

/// Regular files, plus symlinks whose target is not a directory.
fn is_file_like(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

/// Index-aligned cube and image file names.
///
/// Position `i` of both lists names the same scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairList {
    cubes: Vec<String>,
    images: Vec<String>,
}

impl PairList {
    /// Derive `<id>.<cube_ext>` and `<id><image_suffix>.<image_ext>` for
    /// every identifier.
    pub fn build(names: &[String], layout: &LayoutConfig) -> Self {
        let cubes = names
            .iter()
            .map(|name| format!("{}.{}", name, layout.cube_ext))
            .collect();
        let images = names
            .iter()
            .map(|name| format!("{}{}.{}", name, layout.image_suffix, layout.image_ext))
            .collect();
        Self { cubes, images }
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Cube file name at `index`.
    pub fn cube_file(&self, index: usize) -> Option<&str> {
        self.cubes.get(index).map(String::as_str)
    }

    /// Image file name at `index`.
    pub fn image_file(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(String::as_str)
    }

    /// Scene name at `index`: the cube file name up to its first `.`.
    pub fn identifier(&self, index: usize) -> Option<&str> {
        self.cube_file(index).and_then(|name| name.split('.').next())
    }

    /// All cube file names in order.
    pub fn cubes(&self) -> &[String] {
        &self.cubes
    }

    /// All image file names in order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Iterate `(cube_file, image_file)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.cubes
            .iter()
            .zip(&self.images)
            .map(|(c, i)| (c.as_str(), i.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_truncates_to_prefix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ARAD_HS_0002.mat");
        touch(dir.path(), "ARAD_HS_0001.mat");

        let names = resolve_names(dir.path(), 12).unwrap();
        assert_eq!(names, vec!["ARAD_HS_0001", "ARAD_HS_0002"]);
    }

    #[test]
    fn test_keeps_duplicates_and_recurses() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ARAD_HS_0001.mat");
        touch(dir.path(), "ARAD_HS_0001_extra.txt");
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "ARAD_HS_0003.mat");

        let mut names = resolve_names(dir.path(), 12).unwrap();
        names.sort();
        assert_eq!(names, vec!["ARAD_HS_0001", "ARAD_HS_0001", "ARAD_HS_0003"]);
    }

    #[test]
    fn test_short_names_kept_whole() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mat");

        assert_eq!(resolve_names(dir.path(), 12).unwrap(), vec!["a.mat"]);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "åäö_scene.mat");

        assert_eq!(resolve_names(dir.path(), 3).unwrap(), vec!["åäö"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_counted() {
        use std::os::unix::fs::symlink;

        let store = TempDir::new().unwrap();
        touch(store.path(), "scene.mat");
        fs::create_dir(store.path().join("linked_dir")).unwrap();
        touch(&store.path().join("linked_dir"), "ARAD_HS_0009.mat");

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ARAD_HS_0002.mat");
        symlink(store.path().join("scene.mat"), dir.path().join("ARAD_HS_0001.mat")).unwrap();
        symlink(store.path().join("missing.mat"), dir.path().join("ARAD_HS_0003.mat")).unwrap();
        symlink(store.path().join("linked_dir"), dir.path().join("ARAD_HS_0004")).unwrap();

        let names = resolve_names(dir.path(), 12).unwrap();
        assert_eq!(names, vec!["ARAD_HS_0001", "ARAD_HS_0002", "ARAD_HS_0003"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ARAD_HS_0001.mat");
        fs::write(dir.path().join(OsStr::from_bytes(b"ARAD_\xff\xfe_0002.mat")), b"").unwrap();

        let names = resolve_names(dir.path(), 12).unwrap();
        assert_eq!(names, vec!["ARAD_HS_0001"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_names(dir.path(), 12).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_propagates() {
        let dir = TempDir::new().unwrap();
        let err = resolve_names(&dir.path().join("absent"), 12).unwrap_err();
        assert!(matches!(err, DatasetError::Walk { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pair_list_alignment() {
        let names = vec!["ARAD_HS_0001".to_string(), "ARAD_HS_0002".to_string()];
        let pairs = PairList::build(&names, &LayoutConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.cubes().len(), pairs.images().len());
        assert_eq!(pairs.cube_file(1), Some("ARAD_HS_0002.mat"));
        assert_eq!(pairs.image_file(1), Some("ARAD_HS_0002_RealWorld.jpg"));
        assert_eq!(pairs.identifier(0), Some("ARAD_HS_0001"));
        assert_eq!(pairs.cube_file(2), None);
    }

    #[test]
    fn test_pair_list_custom_layout() {
        let layout = LayoutConfig {
            cube_ext: "npy".to_string(),
            image_suffix: "_clean".to_string(),
            image_ext: "png".to_string(),
            ..LayoutConfig::default()
        };
        let pairs = PairList::build(&["scene".to_string()], &layout);

        let collected: Vec<_> = pairs.iter().collect();
        assert_eq!(collected, vec![("scene.npy", "scene_clean.png")]);
    }
}
