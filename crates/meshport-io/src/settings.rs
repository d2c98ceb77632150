//! Export settings: PLY representation and base directory.

use std::path::{Path, PathBuf};

use crate::ply::PlyFormat;

/// Options consulted by [`export_file`](crate::asset::export_file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoSettings {
    /// Record representation for exported PLY files.
    pub default_ply_format: PlyFormat,
    /// Directory relative export paths are resolved against.
    pub base_directory: Option<PathBuf>,
}

impl Default for IoSettings {
    fn default() -> Self {
        Self {
            default_ply_format: PlyFormat::BinaryLittleEndian,
            base_directory: None,
        }
    }
}

impl IoSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ply_format(mut self, format: PlyFormat) -> Self {
        self.default_ply_format = format;
        self
    }

    pub fn with_base_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(dir.into());
        self
    }

    /// Joins a relative `path` onto the base directory, if one is set.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_directory {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = IoSettings::default();
        assert_eq!(settings.default_ply_format, PlyFormat::BinaryLittleEndian);
        assert_eq!(settings.resolve(Path::new("a.ply")), PathBuf::from("a.ply"));
    }

    #[test]
    fn test_base_directory_applies_to_relative_paths() {
        let settings = IoSettings::new()
            .with_ply_format(PlyFormat::Ascii)
            .with_base_directory("/data/out");
        assert_eq!(settings.resolve(Path::new("a.ply")), PathBuf::from("/data/out/a.ply"));
        assert_eq!(settings.resolve(Path::new("/tmp/b.ply")), PathBuf::from("/tmp/b.ply"));
    }
}
