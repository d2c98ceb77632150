//! PLY export of a single mesh in ASCII or little-endian binary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use meshport_core::Mesh;
use tracing::info;

use crate::error::{MeshIoError, Result};
use crate::ply::codec::{ElementWriter, VertexLayout};
use crate::ply::header::{write_header, ElementDecl, PlyFile};
use crate::ply::keywords;
use crate::ply::types::ScalarType;
use crate::ply::PlyFormat;
use crate::traits::{PointCloudWriter, Writer};

/// PLY exporter for a single mesh.
///
/// ```ignore
/// let mut writer = PlyWriter::new().with_format(PlyFormat::Ascii);
/// writer.add_mesh(&mesh, None)?;
/// writer.write("out.ply")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlyWriter {
    format: PlyFormat,
    mesh: Option<Mesh>,
}

impl PlyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: PlyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> PlyFormat {
        self.format
    }

    /// Writes to `path`. The mesh is validated before the file is created, so
    /// a rejected export leaves an existing file untouched.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let (mesh, ply) = self.prepare(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_mesh(mesh, ply, &mut writer)
    }

    /// Writes header and records to any sink.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let (mesh, ply) = self.prepare(Path::new(""))?;
        self.write_mesh(mesh, ply, writer)
    }

    fn prepare(&self, path: &Path) -> Result<(&Mesh, PlyFile)> {
        let mesh = self.queued()?;
        self.check_format()?;
        let ply = construct_ply_file(mesh, path, self.format)?;
        Ok((mesh, ply))
    }

    #[tracing::instrument(skip_all, fields(path = %ply.path.display(), format = %self.format))]
    fn write_mesh<W: Write>(&self, mesh: &Mesh, mut ply: PlyFile, writer: &mut W) -> Result<()> {
        write_header(&mut ply, writer)?;
        ElementWriter::for_format(ply.format, writer)?.write_records(mesh)?;
        info!(
            points = mesh.num_points(),
            faces = mesh.num_faces(),
            edges = mesh.edges.len(),
            "exported PLY mesh"
        );
        Ok(())
    }

    fn check_format(&self) -> Result<()> {
        if self.format == PlyFormat::BinaryBigEndian {
            return Err(MeshIoError::UnsupportedRepresentation(
                self.format.keyword().to_string(),
            ));
        }
        Ok(())
    }

    fn queued(&self) -> Result<&Mesh> {
        self.mesh
            .as_ref()
            .ok_or_else(|| MeshIoError::InvalidScene("no mesh added to the PLY writer".into()))
    }
}

impl Writer for PlyWriter {
    fn new() -> Self {
        PlyWriter::new()
    }

    fn add_mesh(&mut self, mesh: &Mesh, name: Option<&str>) -> Result<()> {
        if self.mesh.is_some() {
            return Err(MeshIoError::InvalidScene(
                "a PLY file holds exactly one mesh".into(),
            ));
        }
        let mut mesh = mesh.clone();
        if let Some(name) = name {
            mesh.name = name.to_string();
        }
        self.mesh = Some(mesh);
        Ok(())
    }

    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PlyWriter::write(self, path)
    }

    fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::num_points)
    }

    fn face_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::num_faces)
    }
}

impl PointCloudWriter for PlyWriter {
    fn add_points(&mut self, points: &[[f32; 3]]) {
        self.mesh
            .get_or_insert_with(Mesh::new)
            .points
            .extend_from_slice(points);
    }
}

/// Builds the element declarations written for `mesh`.
///
/// The vertex element always carries `x y z` floats, followed by normals and
/// `uchar` RGBA when the mesh has them. `face` and `edge` elements are only
/// declared when the mesh has faces or edges.
pub fn construct_ply_file(mesh: &Mesh, path: &Path, format: PlyFormat) -> Result<PlyFile> {
    let layout = VertexLayout::for_mesh(mesh)?;
    let mut ply = PlyFile::new(path);
    ply.format = format;
    ply.comments = banner(mesh);

    let mut vertex = ElementDecl::new(keywords::VERTEX, mesh.num_points());
    for name in ["x", "y", "z"] {
        vertex.add_scalar(name, ScalarType::Float32);
    }
    if layout.has_normals() {
        for name in ["nx", "ny", "nz"] {
            vertex.add_scalar(name, ScalarType::Float32);
        }
    }
    if layout.has_colors() {
        for name in ["red", "green", "blue", "alpha"] {
            vertex.add_scalar(name, ScalarType::UInt8);
        }
    }
    ply.elements.push(vertex);

    if mesh.num_faces() > 0 {
        let mut face = ElementDecl::new(keywords::FACE, mesh.num_faces());
        face.add_list("vertex_indices", ScalarType::UInt8, ScalarType::Int32);
        ply.elements.push(face);
    }

    if mesh.contains_edges() {
        let mut edge = ElementDecl::new(keywords::EDGE, mesh.edges.len());
        edge.add_scalar("vertex1", ScalarType::Int32);
        edge.add_scalar("vertex2", ScalarType::Int32);
        for name in ["red", "green", "blue"] {
            edge.add_scalar(name, ScalarType::UInt8);
        }
        ply.elements.push(edge);
    }

    Ok(ply)
}

/// Descriptive comments kept on the in-memory header; not written.
fn banner(mesh: &Mesh) -> Vec<String> {
    vec![
        format!("meshport {}", env!("CARGO_PKG_VERSION")),
        format!("Point count: {}", mesh.num_points()),
    ]
}
