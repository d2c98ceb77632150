//! Common traits for readers and writers.
//!
//! Every format implements the same small surface so callers can stay
//! generic over the file type:
//!
//! ```ignore
//! use meshport_io::{Reader, Writer, PlyReader, ObjWriter};
//!
//! fn convert<R: Reader, W: Writer>(input: &str, output: &str) -> meshport_io::Result<()> {
//!     let mesh = R::open(input)?.read_mesh()?;
//!     let mut writer = W::new();
//!     writer.add_mesh(&mesh, Some("converted"))?;
//!     writer.write(output)
//! }
//! ```

use std::path::Path;

use meshport_core::Mesh;

use crate::error::{MeshIoError, Result};

/// Common interface for mesh writers.
pub trait Writer: Sized {
    /// Create a writer with default settings.
    fn new() -> Self;

    /// Queue a mesh for output.
    ///
    /// `name` overrides the mesh's own name where the format stores one.
    fn add_mesh(&mut self, mesh: &Mesh, name: Option<&str>) -> Result<()>;

    /// Write every queued mesh to `path`.
    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    fn vertex_count(&self) -> usize;

    fn face_count(&self) -> usize {
        0
    }
}

/// Common interface for mesh readers.
pub trait Reader: Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Read every mesh in the file.
    fn read_meshes(&mut self) -> Result<Vec<Mesh>>;

    /// First mesh of [`read_meshes`](Reader::read_meshes).
    fn read_mesh(&mut self) -> Result<Mesh> {
        self.read_meshes()?
            .into_iter()
            .next()
            .ok_or_else(|| MeshIoError::InvalidScene("no mesh found".into()))
    }
}

/// Writers that can output bare point sets.
pub trait PointCloudWriter: Writer {
    fn add_points(&mut self, points: &[[f32; 3]]);

    fn add_point(&mut self, point: [f32; 3]) {
        self.add_points(&[point]);
    }
}

/// Readers that can return positions alone.
pub trait PointCloudReader: Reader {
    /// Point positions only, no faces or other channels.
    fn read_points(&mut self) -> Result<Vec<[f32; 3]>>;
}
