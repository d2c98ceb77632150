//! Extension-based dispatch between the PLY and OBJ codecs.

use std::fmt;
use std::path::{Path, PathBuf};

use meshport_core::Scene;
use tracing::debug;

use crate::error::{MeshIoError, Result};
use crate::obj::{self, ObjWriter};
use crate::ply::{self, PlyWriter};
use crate::settings::IoSettings;
use crate::traits::Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    Ply,
    Obj,
}

impl AssetFormat {
    /// Extension without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            AssetFormat::Ply => "ply",
            AssetFormat::Obj => "obj",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            AssetFormat::Ply => "Stanford Polygon File Format",
            AssetFormat::Obj => "Wavefront Technologies OBJ",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ply" => Some(AssetFormat::Ply),
            "obj" => Some(AssetFormat::Obj),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| MeshIoError::UnsupportedFormat(path.display().to_string()))
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Imports `path` with the codec its extension selects.
pub fn import_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    match AssetFormat::from_path(path)? {
        AssetFormat::Ply => ply::reader::read_scene(path),
        AssetFormat::Obj => obj::reader::read_scene(path),
    }
}

/// Exports a single-mesh scene and returns the path actually written.
///
/// The format comes from the extension of `path`; a path without a
/// recognized extension is written as PLY with the extension added.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), overwrite = overwrite))]
pub fn export_file(
    scene: &Scene,
    path: impl AsRef<Path>,
    overwrite: bool,
    settings: &IoSettings,
) -> Result<PathBuf> {
    let requested = settings.resolve(path.as_ref());
    let format = match AssetFormat::from_path(&requested) {
        Ok(format) => format,
        Err(err) if has_real_extension(&requested) => return Err(err),
        Err(_) => AssetFormat::Ply,
    };
    let target = correct_file_path(&requested, format)?;

    if target.exists() && !overwrite {
        return Err(MeshIoError::AlreadyExists(target));
    }
    let [mesh] = scene.meshes.as_slice() else {
        return Err(MeshIoError::InvalidScene(format!(
            "can only export scenes holding a single mesh, found {}",
            scene.meshes.len()
        )));
    };

    debug!(format = %format, target = %target.display(), "exporting scene");
    match format {
        AssetFormat::Ply => {
            let mut writer = PlyWriter::new().with_format(settings.default_ply_format);
            writer.add_mesh(mesh, None)?;
            writer.write(&target)?;
        }
        AssetFormat::Obj => {
            let mut writer = ObjWriter::new();
            writer.add_mesh(mesh, None)?;
            writer.write(&target)?;
        }
    }
    Ok(target)
}

/// True when the last dot-suffix is a non-numeric extension.
fn has_real_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| !e.is_empty() && !e.bytes().all(|b| b.is_ascii_digit()))
}

/// Gives `path` the extension of `format`.
///
/// A wrong extension is replaced and a missing one added; a purely numeric
/// suffix such as the frame number in `scan.0100` is kept. The parent
/// directory must already exist.
pub fn correct_file_path(path: impl AsRef<Path>, format: AssetFormat) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(MeshIoError::DirectoryNotFound(parent.to_path_buf()));
        }
    }

    if has_real_extension(path) {
        return Ok(path.with_extension(format.extension()));
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    Ok(PathBuf::from(name))
}
