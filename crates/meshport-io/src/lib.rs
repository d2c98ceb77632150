//! Meshport I/O library for reading and writing PLY and Wavefront OBJ files.
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | PLY (ascii)                | ✓ | ✓ | |
//! | PLY (binary_little_endian) | ✓ | ✓ | default export representation |
//! | PLY (binary_big_endian)    | - | - | rejected with `UnsupportedRepresentation` |
//! | OBJ                        | ✓ | ✓ | `v`, `vn`, `vt`, `f`, `g` |
//!
//! # Unified Trait API
//!
//! All readers implement [`Reader`] and all writers implement [`Writer`]:
//!
//! ```ignore
//! use meshport_io::{Reader, Writer, ObjReader, PlyWriter};
//!
//! let mesh = ObjReader::open("input.obj")?.read_mesh()?;
//! let mut ply = PlyWriter::new().with_format(PlyFormat::Ascii);
//! ply.add_mesh(&mesh, None)?;
//! ply.write("output.ply")?;
//! ```
//!
//! # Extension dispatch
//!
//! [`import_file`] and [`export_file`] pick the codec from the file
//! extension:
//!
//! ```ignore
//! use meshport_io::{export_file, import_file, IoSettings};
//!
//! let scene = import_file("scan.obj")?;
//! export_file(&scene, "scan.ply", true, &IoSettings::default())?;
//! ```

pub mod asset;
pub mod error;
pub mod obj;
pub mod ply;
pub mod settings;
pub mod traits;

pub use asset::{correct_file_path, export_file, import_file, AssetFormat};
pub use error::{MeshIoError, Result};
pub use obj::{ObjDocument, ObjReader, ObjWriter};
pub use ply::{PlyFile, PlyFormat, PlyReader, PlyWriter};
pub use settings::IoSettings;
pub use traits::{PointCloudReader, PointCloudWriter, Reader, Writer};
