//! Wavefront OBJ support.

pub mod face;
pub mod material;
pub mod reader;
pub mod writer;

pub use face::{parse_face, Corner, Face, FaceKind, IndexGrammar, Tables};
pub use material::{load_mtl, parse_mtl, MaterialLibrary};
pub use reader::{parse_obj, Group, ObjDocument, ObjReader};
pub use writer::ObjWriter;
