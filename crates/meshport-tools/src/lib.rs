//! Library side of the `meshport` command-line tool.
//!
//! The binary only parses arguments and installs logging; the commands live
//! here so they can be tested without spawning a process.

use std::fmt;
use std::path::{Path, PathBuf};

use meshport_core::Mesh;
use meshport_io::ply::PlyReader;
use meshport_io::{export_file, import_file, AssetFormat, IoSettings, MeshIoError, PlyFormat};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] MeshIoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ElementSummary {
    pub name: String,
    pub count: usize,
    pub properties: Vec<String>,
}

/// Header facts of a PLY file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlySummary {
    pub representation: String,
    pub version: f32,
    pub elements: Vec<ElementSummary>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeshSummary {
    pub name: String,
    pub points: usize,
    pub faces: usize,
    pub normals: usize,
    pub colors: usize,
    pub texture_coordinates: usize,
    pub edges: usize,
}

impl From<&Mesh> for MeshSummary {
    fn from(mesh: &Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            points: mesh.num_points(),
            faces: mesh.num_faces(),
            normals: mesh.normals.len(),
            colors: mesh.colors.len(),
            texture_coordinates: mesh.texture_coordinates.len(),
            edges: mesh.edges.len(),
        }
    }
}

/// Result of `meshport inspect`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ply: Option<PlySummary>,
    pub meshes: Vec<MeshSummary>,
}

impl FileSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.path.display(), self.format)?;
        if let Some(ply) = &self.ply {
            writeln!(f, "  representation: {} {:.1}", ply.representation, ply.version)?;
            for comment in &ply.comments {
                writeln!(f, "  comment: {comment}")?;
            }
            for info in &ply.obj_info {
                writeln!(f, "  obj_info: {info}")?;
            }
            for element in &ply.elements {
                writeln!(f, "  element {} ({} records)", element.name, element.count)?;
                for property in &element.properties {
                    writeln!(f, "    {property}")?;
                }
            }
        }
        for mesh in &self.meshes {
            writeln!(
                f,
                "  mesh '{}': {} points, {} faces, {} normals, {} colors, {} texture coordinates, {} edges",
                mesh.name,
                mesh.points,
                mesh.faces,
                mesh.normals,
                mesh.colors,
                mesh.texture_coordinates,
                mesh.edges
            )?;
        }
        Ok(())
    }
}

/// Reads `path` and summarizes its contents.
pub fn inspect(path: impl AsRef<Path>) -> Result<FileSummary> {
    let path = path.as_ref();
    let format = AssetFormat::from_path(path)?;

    let ply = match format {
        AssetFormat::Ply => {
            let header = PlyReader::open(path)?.read_header()?;
            Some(PlySummary {
                representation: header.format.to_string(),
                version: header.version,
                elements: header
                    .elements
                    .iter()
                    .map(|e| ElementSummary {
                        name: e.name.clone(),
                        count: e.count,
                        properties: e.properties().map(|p| p.to_string()).collect(),
                    })
                    .collect(),
                comments: header.comments,
                obj_info: header.obj_info,
            })
        }
        AssetFormat::Obj => None,
    };

    let scene = import_file(path)?;
    Ok(FileSummary {
        path: path.to_path_buf(),
        format: format.extension().to_string(),
        ply,
        meshes: scene.meshes.iter().map(MeshSummary::from).collect(),
    })
}

/// Imports `input` and exports it to `output`, returning the written path.
///
/// `ply_format` overrides the default PLY representation.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    ply_format: Option<PlyFormat>,
    overwrite: bool,
) -> Result<PathBuf> {
    let mut settings = IoSettings::default();
    if let Some(format) = ply_format {
        settings = settings.with_ply_format(format);
    }
    let scene = import_file(input.as_ref())?;
    let written = export_file(&scene, output.as_ref(), overwrite, &settings)?;
    info!(
        input = %input.as_ref().display(),
        output = %written.display(),
        "conversion complete"
    );
    Ok(written)
}
