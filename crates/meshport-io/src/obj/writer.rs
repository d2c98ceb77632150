//! Wavefront OBJ export with one `g` group per mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use meshport_core::Mesh;
use tracing::info;

use crate::error::{MeshIoError, Result};
use crate::traits::{PointCloudWriter, Writer};

/// Wavefront OBJ exporter.
///
/// Each added mesh becomes a `g` group; indices are offset so that all
/// groups share the file's global vertex tables.
#[derive(Debug, Clone, Default)]
pub struct ObjWriter {
    meshes: Vec<Mesh>,
}

impl ObjWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes to `path`. Meshes are validated before the file is created, so
    /// a rejected export leaves an existing file untouched.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    fn validate(&self) -> Result<()> {
        self.meshes.iter().try_for_each(|mesh| {
            check_parallel(mesh, mesh.contains_normals(), !mesh.texture_coordinates.is_empty())
        })
    }

    #[tracing::instrument(skip_all, fields(meshes = self.meshes.len()))]
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.validate()?;
        writeln!(writer, "# meshport {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(writer, "# Point count: {}", self.vertex_count())?;

        let mut position_base = 1u64;
        let mut normal_base = 1u64;
        let mut texture_base = 1u64;

        for mesh in &self.meshes {
            let has_normals = mesh.contains_normals();
            let has_textures = !mesh.texture_coordinates.is_empty();

            if !mesh.name.is_empty() {
                writeln!(writer, "g {}", mesh.name)?;
            }
            for [x, y, z] in &mesh.points {
                writeln!(writer, "v {x} {y} {z}")?;
            }
            if has_normals {
                for [x, y, z] in &mesh.normals {
                    writeln!(writer, "vn {x} {y} {z}")?;
                }
            }
            if has_textures {
                for [u, v, _] in &mesh.texture_coordinates {
                    writeln!(writer, "vt {u} {v}")?;
                }
            }

            for face in mesh.faces() {
                write!(writer, "f")?;
                for &i in face {
                    let p = position_base + u64::from(i);
                    match (has_textures, has_normals) {
                        (false, false) => write!(writer, " {p}")?,
                        (true, false) => write!(writer, " {p}/{}", texture_base + u64::from(i))?,
                        (false, true) => write!(writer, " {p}//{}", normal_base + u64::from(i))?,
                        (true, true) => write!(
                            writer,
                            " {p}/{}/{}",
                            texture_base + u64::from(i),
                            normal_base + u64::from(i)
                        )?,
                    }
                }
                writeln!(writer)?;
            }

            position_base += mesh.points.len() as u64;
            if has_normals {
                normal_base += mesh.normals.len() as u64;
            }
            if has_textures {
                texture_base += mesh.texture_coordinates.len() as u64;
            }
        }

        writer.flush()?;
        info!(
            points = self.vertex_count(),
            faces = self.face_count(),
            "exported OBJ document"
        );
        Ok(())
    }
}

fn check_parallel(mesh: &Mesh, has_normals: bool, has_textures: bool) -> Result<()> {
    let n = mesh.num_points();
    if has_normals && mesh.normals.len() != n {
        return Err(MeshIoError::InvalidScene(format!(
            "mesh '{}' has {} normals for {n} points",
            mesh.name,
            mesh.normals.len()
        )));
    }
    if has_textures && mesh.texture_coordinates.len() != n {
        return Err(MeshIoError::InvalidScene(format!(
            "mesh '{}' has {} texture coordinates for {n} points",
            mesh.name,
            mesh.texture_coordinates.len()
        )));
    }
    if let Some(bad) = mesh.indices().find(|&i| i as usize >= n) {
        return Err(MeshIoError::InvalidScene(format!(
            "mesh '{}' references point {bad} of {n}",
            mesh.name
        )));
    }
    Ok(())
}

impl Writer for ObjWriter {
    fn new() -> Self {
        ObjWriter::new()
    }

    fn add_mesh(&mut self, mesh: &Mesh, name: Option<&str>) -> Result<()> {
        let mut mesh = mesh.clone();
        if let Some(name) = name {
            mesh.name = name.to_string();
        }
        self.meshes.push(mesh);
        Ok(())
    }

    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ObjWriter::write(self, path)
    }

    fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::num_points).sum()
    }

    fn face_count(&self) -> usize {
        self.meshes.iter().map(Mesh::num_faces).sum()
    }
}

impl PointCloudWriter for ObjWriter {
    fn add_points(&mut self, points: &[[f32; 3]]) {
        self.meshes.push(Mesh::from_points(points.to_vec()));
    }
}
