//! PLY import: record decoding and mesh assembly.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use meshport_core::{Color, Edge, Mesh, Scene};
use tracing::{debug, info, warn};

use crate::error::{MeshIoError, Result};
use crate::ply::codec::{tokens_to_record, ElementReader};
use crate::ply::header::{decode_header, ElementDecl, PlyFile, Record};
use crate::ply::keywords;
use crate::ply::slots::{Slot, SlotMap};
use crate::traits::{PointCloudReader, Reader};

/// Upper bound on records reserved up front; declared counts are untrusted.
const PREALLOC_RECORDS: usize = 4096;

/// PLY importer.
#[derive(Debug)]
pub struct PlyReader {
    path: PathBuf,
}

impl PlyReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(MeshIoError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decodes header and records without assembling a mesh.
    pub fn read_ply_file(&self) -> Result<PlyFile> {
        let file = File::open(&self.path)?;
        decode_ply(&mut BufReader::new(file), &self.path)
    }

    /// Decodes only the header.
    pub fn read_header(&self) -> Result<PlyFile> {
        let file = File::open(&self.path)?;
        decode_header(&mut BufReader::new(file), &self.path)
    }
}

impl Reader for PlyReader {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        PlyReader::open(path)
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    fn read_meshes(&mut self) -> Result<Vec<Mesh>> {
        let ply = self.read_ply_file()?;
        let mut mesh = build_mesh(&ply)?;
        mesh.name = mesh_name(&self.path);
        info!(
            points = mesh.num_points(),
            faces = mesh.num_faces(),
            edges = mesh.edges.len(),
            "imported PLY mesh"
        );
        Ok(vec![mesh])
    }
}

impl PointCloudReader for PlyReader {
    fn read_points(&mut self) -> Result<Vec<[f32; 3]>> {
        let ply = self.read_ply_file()?;
        Ok(build_mesh(&ply)?.points)
    }
}

/// Imports a PLY file as a single-mesh scene.
pub fn read_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let mesh = PlyReader::open(path)?.read_mesh()?;
    Ok(Scene::single(mesh).with_path(path))
}

fn mesh_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Decodes header and every element's records from `reader`.
///
/// Fails with `UnsupportedRepresentation` for big-endian data before any
/// record byte is consumed, and with `TruncatedRecord` when the stream
/// holds fewer records than declared.
pub fn decode_ply<R: BufRead>(reader: &mut R, path: impl AsRef<Path>) -> Result<PlyFile> {
    let mut ply = decode_header(reader, path)?;
    let mut records = ElementReader::for_format(ply.format, reader)?;
    for element in &mut ply.elements {
        let mut decoded = Vec::with_capacity(element.count.min(PREALLOC_RECORDS));
        for i in 0..element.count {
            let tokens = records.read_record(element)?.ok_or_else(|| {
                MeshIoError::truncated(
                    &element.name,
                    format!("expected {} records, found {i}", element.count),
                )
            })?;
            decoded.push(tokens_to_record(element, &tokens)?);
        }
        debug!(element = %element.name, records = decoded.len(), "decoded element");
        element.records = decoded;
    }
    Ok(ply)
}

/// Assembles the vertex, face and edge elements of `ply` into one mesh.
///
/// Other elements are ignored.
pub fn build_mesh(ply: &PlyFile) -> Result<Mesh> {
    let mut mesh = Mesh::new();
    for element in &ply.elements {
        let slots = SlotMap::resolve(element);
        match element.name.as_str() {
            keywords::VERTEX => add_vertices(&mut mesh, element, &slots)?,
            keywords::FACE => add_faces(&mut mesh, element)?,
            keywords::EDGE => add_edges(&mut mesh, element, &slots)?,
            other => debug!(element = other, "skipping element"),
        }
    }
    Ok(mesh)
}

fn triple(
    element: &ElementDecl,
    record: &Record,
    slots: &SlotMap,
    keys: [Slot; 3],
) -> Option<[f32; 3]> {
    let [a, b, c] = keys.map(|k| slots.value(element, record, k));
    Some([a?.to_f32(), b?.to_f32(), c?.to_f32()])
}

fn channel(element: &ElementDecl, record: &Record, slots: &SlotMap, slot: Slot) -> Result<Option<u8>> {
    slots
        .value(element, record, slot)
        .map(|v| v.to_u8())
        .transpose()
}

fn add_vertices(mesh: &mut Mesh, element: &ElementDecl, slots: &SlotMap) -> Result<()> {
    for record in &element.records {
        if let Some(point) = triple(element, record, slots, [Slot::X, Slot::Y, Slot::Z]) {
            mesh.points.push(point);
        }
        if let Some(normal) = triple(element, record, slots, [Slot::Nx, Slot::Ny, Slot::Nz]) {
            mesh.normals.push(normal);
        }
        let rgb = (
            channel(element, record, slots, Slot::Red)?,
            channel(element, record, slots, Slot::Green)?,
            channel(element, record, slots, Slot::Blue)?,
        );
        if let (Some(r), Some(g), Some(b)) = rgb {
            let a = channel(element, record, slots, Slot::Alpha)?.unwrap_or(u8::MAX);
            mesh.colors.push(Color::new(r, g, b, a));
        }
        if let (Some(s), Some(t)) = (
            slots.value(element, record, Slot::S),
            slots.value(element, record, Slot::T),
        ) {
            mesh.texture_coordinates.push([s.to_f32(), t.to_f32(), 0.0]);
        }
    }
    Ok(())
}

fn add_faces(mesh: &mut Mesh, element: &ElementDecl) -> Result<()> {
    let list = element.first_list().map(|p| p.index);
    for record in &element.records {
        let values = match list {
            Some(index) => record.field(element, index).unwrap_or_default(),
            None => record.values.as_slice(),
        };
        if values.len() != 3 {
            return Err(MeshIoError::UnexpectedArity {
                context: format!("'{}' element (only triangles are supported)", element.name),
                found: values.len(),
            });
        }
        mesh.add_face([values[0].to_u32()?, values[1].to_u32()?, values[2].to_u32()?]);
    }
    Ok(())
}

fn add_edges(mesh: &mut Mesh, element: &ElementDecl, slots: &SlotMap) -> Result<()> {
    const REQUIRED: [Slot; 5] = [Slot::Vertex1, Slot::Vertex2, Slot::Red, Slot::Green, Slot::Blue];
    if !slots.contains_all(&REQUIRED) {
        warn!(
            records = element.records.len(),
            "edge element lacks vertex1/vertex2/red/green/blue, dropping its records"
        );
        return Ok(());
    }

    for record in &element.records {
        let value = |slot| {
            slots
                .value(element, record, slot)
                .ok_or_else(|| MeshIoError::truncated(&element.name, "edge record is missing a field"))
        };
        let color = Color::new(
            value(Slot::Red)?.to_u8()?,
            value(Slot::Green)?.to_u8()?,
            value(Slot::Blue)?.to_u8()?,
            u8::MAX,
        );
        mesh.edges.push(Edge::new(
            value(Slot::Vertex1)?.to_i32()?,
            value(Slot::Vertex2)?.to_i32()?,
            color,
        ));
    }
    Ok(())
}
