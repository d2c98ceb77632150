//! Representation dispatch shared by the PLY reader and writer.
//!
//! Both record codecs produce the same raw token sequence for a record;
//! [`tokens_to_record`] turns those tokens into typed values using the
//! element's declarations.

use std::io::{BufRead, Write};

use meshport_core::Mesh;

use crate::error::{MeshIoError, Result};
use crate::ply::ascii::{AsciiReader, AsciiWriter};
use crate::ply::binary::{BinaryReader, BinaryWriter};
use crate::ply::header::{ElementDecl, Record};
use crate::ply::PlyFormat;

/// Progress of an element reader through the record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecState {
    AwaitingFirstRecord,
    StreamingRecords,
    Exhausted,
}

fn reject_big_endian(format: PlyFormat) -> Result<()> {
    if format == PlyFormat::BinaryBigEndian {
        return Err(MeshIoError::UnsupportedRepresentation(format.keyword().to_string()));
    }
    Ok(())
}

pub enum ElementReader<R> {
    Ascii(AsciiReader<R>),
    Binary(BinaryReader<R>),
}

impl<R: BufRead> ElementReader<R> {
    pub fn for_format(format: PlyFormat, reader: R) -> Result<Self> {
        reject_big_endian(format)?;
        Ok(match format {
            PlyFormat::Ascii => ElementReader::Ascii(AsciiReader::new(reader)),
            _ => ElementReader::Binary(BinaryReader::new(reader)),
        })
    }

    pub fn read_record(&mut self, element: &ElementDecl) -> Result<Option<Vec<String>>> {
        match self {
            ElementReader::Ascii(r) => r.read_record(element),
            ElementReader::Binary(r) => r.read_record(element),
        }
    }

    pub fn state(&self) -> CodecState {
        match self {
            ElementReader::Ascii(r) => r.state(),
            ElementReader::Binary(r) => r.state(),
        }
    }
}

pub enum ElementWriter<W> {
    Ascii(AsciiWriter<W>),
    Binary(BinaryWriter<W>),
}

impl<W: Write> ElementWriter<W> {
    pub fn for_format(format: PlyFormat, writer: W) -> Result<Self> {
        reject_big_endian(format)?;
        Ok(match format {
            PlyFormat::Ascii => ElementWriter::Ascii(AsciiWriter::new(writer)),
            _ => ElementWriter::Binary(BinaryWriter::new(writer)),
        })
    }

    pub fn write_records(&mut self, mesh: &Mesh) -> Result<()> {
        match self {
            ElementWriter::Ascii(w) => w.write_records(mesh),
            ElementWriter::Binary(w) => w.write_records(mesh),
        }
    }
}

/// Per-vertex channels written on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    Point,
    PointNormal,
    PointNormalColor,
    PointColor,
}

impl VertexLayout {
    /// Picks the layout for `mesh`, checking that every channel it selects
    /// runs parallel to the points.
    pub fn for_mesh(mesh: &Mesh) -> Result<Self> {
        let normals = mesh.contains_normals();
        let colors = mesh.contains_colors();
        let n = mesh.num_points();

        if normals && mesh.normals.len() != n {
            return Err(MeshIoError::InvalidScene(format!(
                "mesh has {} normals for {n} points",
                mesh.normals.len()
            )));
        }
        if colors && mesh.colors.len() != n {
            return Err(MeshIoError::InvalidScene(format!(
                "mesh has {} colors for {n} points",
                mesh.colors.len()
            )));
        }
        if let Some(bad) = mesh.indices().find(|&i| i as usize >= n) {
            return Err(MeshIoError::InvalidScene(format!(
                "face references point {bad} of {n}"
            )));
        }

        Ok(match (normals, colors) {
            (false, false) => VertexLayout::Point,
            (true, false) => VertexLayout::PointNormal,
            (true, true) => VertexLayout::PointNormalColor,
            (false, true) => VertexLayout::PointColor,
        })
    }

    pub fn has_normals(self) -> bool {
        matches!(self, VertexLayout::PointNormal | VertexLayout::PointNormalColor)
    }

    pub fn has_colors(self) -> bool {
        matches!(self, VertexLayout::PointColor | VertexLayout::PointNormalColor)
    }
}

/// Converts the raw tokens of one record into typed values.
///
/// List lengths are parsed with the length type, list elements with the
/// element type. Missing tokens truncate the record; leftover tokens are
/// rejected.
pub fn tokens_to_record(element: &ElementDecl, tokens: &[String]) -> Result<Record> {
    let mut values = Vec::with_capacity(tokens.len());
    let mut rest = tokens.iter();
    let mut next = |what: &str| {
        rest.next().ok_or_else(|| {
            MeshIoError::truncated(&element.name, format!("record ends before {what}"))
        })
    };

    for property in element.properties() {
        match property.list_length_type {
            Some(length_type) => {
                let length = length_type.parse_token(next(&property.name)?)?;
                let count = length.to_usize()?;
                values.push(length);
                for _ in 0..count {
                    values.push(property.value_type.parse_token(next(&property.name)?)?);
                }
            }
            None => values.push(property.value_type.parse_token(next(&property.name)?)?),
        }
    }

    if let Some(extra) = rest.next() {
        return Err(MeshIoError::token(
            extra,
            format!("trailing token in element '{}'", element.name),
        ));
    }
    Ok(Record::new(values))
}
