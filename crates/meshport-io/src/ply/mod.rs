//! Stanford PLY support.
//!
//! The header is decoded into [`PlyFile`] / [`ElementDecl`] / [`PropertyDecl`]
//! first; the element codecs then read or write records against that schema
//! in either the ASCII or the little-endian binary representation.

use std::fmt;

pub mod ascii;
pub mod binary;
pub mod codec;
pub mod header;
pub mod reader;
pub mod slots;
pub mod types;
pub mod writer;

pub use header::{decode_header, encode_header, ElementDecl, PlyFile, PropertyDecl, Record};
pub use reader::{decode_ply, PlyReader};
pub use slots::{Slot, SlotMap};
pub use types::{PropertyValue, ScalarType};
pub use writer::PlyWriter;

/// Header keywords and the element names the mesh assembly understands.
pub mod keywords {
    pub const PLY: &str = "ply";
    pub const FORMAT: &str = "format";
    pub const ELEMENT: &str = "element";
    pub const PROPERTY: &str = "property";
    pub const LIST: &str = "list";
    pub const COMMENT: &str = "comment";
    pub const OBJ_INFO: &str = "obj_info";
    pub const END_HEADER: &str = "end_header";

    pub const VERTEX: &str = "vertex";
    pub const FACE: &str = "face";
    pub const EDGE: &str = "edge";
}

/// Representation of the record data that follows the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlyFormat {
    Ascii,
    #[default]
    BinaryLittleEndian,
    /// Recognized in headers, rejected by the readers and writers.
    BinaryBigEndian,
}

impl PlyFormat {
    pub const fn keyword(self) -> &'static str {
        match self {
            PlyFormat::Ascii => "ascii",
            PlyFormat::BinaryLittleEndian => "binary_little_endian",
            PlyFormat::BinaryBigEndian => "binary_big_endian",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ascii" => Some(PlyFormat::Ascii),
            "binary_little_endian" => Some(PlyFormat::BinaryLittleEndian),
            "binary_big_endian" => Some(PlyFormat::BinaryBigEndian),
            _ => None,
        }
    }

    pub fn is_binary(self) -> bool {
        !matches!(self, PlyFormat::Ascii)
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
