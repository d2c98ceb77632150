//! Packed little-endian record representation.

use std::io::{self, BufRead, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use meshport_core::Mesh;

use crate::error::{MeshIoError, Result};
use crate::ply::codec::{CodecState, VertexLayout};
use crate::ply::header::ElementDecl;
use crate::ply::types::{PropertyValue, ScalarType};

pub struct BinaryReader<R> {
    reader: R,
    state: CodecState,
    scratch: [u8; 8],
}

impl<R: BufRead> BinaryReader<R> {
    /// Wraps an input already positioned after `end_header`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: CodecState::AwaitingFirstRecord,
            scratch: [0; 8],
        }
    }

    pub fn state(&self) -> CodecState {
        self.state
    }

    /// Decodes the next record of `element` and returns its values as tokens.
    ///
    /// List properties contribute their length token followed by the
    /// elements. End of input exactly at a record boundary yields
    /// `Ok(None)`; anywhere else it is a truncated record.
    pub fn read_record(&mut self, element: &ElementDecl) -> Result<Option<Vec<String>>> {
        if self.state == CodecState::Exhausted {
            return Ok(None);
        }
        if element.num_properties() > 0 && self.reader.fill_buf()?.is_empty() {
            self.state = CodecState::Exhausted;
            return Ok(None);
        }
        self.state = CodecState::StreamingRecords;

        let mut tokens = Vec::with_capacity(element.num_properties());
        for property in element.properties() {
            match property.list_length_type {
                Some(length_type) => {
                    let length = self.read_value(element, length_type)?;
                    let count = length.to_usize()?;
                    tokens.push(length.to_string());
                    for _ in 0..count {
                        tokens.push(self.read_value(element, property.value_type)?.to_string());
                    }
                }
                None => tokens.push(self.read_value(element, property.value_type)?.to_string()),
            }
        }
        Ok(Some(tokens))
    }

    fn read_value(&mut self, element: &ElementDecl, ty: ScalarType) -> Result<PropertyValue> {
        let span = &mut self.scratch[..ty.byte_width()];
        self.reader.read_exact(span).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => MeshIoError::truncated(
                &element.name,
                format!("stream ended inside a {} value", ty.name()),
            ),
            _ => MeshIoError::Io(e),
        })?;
        ty.decode(span, 0)
            .ok_or_else(|| MeshIoError::truncated(&element.name, "short value buffer"))
    }
}

pub struct BinaryWriter<W> {
    writer: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Appends the vertex, face and edge records of `mesh`.
    pub fn write_records(&mut self, mesh: &Mesh) -> Result<()> {
        let layout = VertexLayout::for_mesh(mesh)?;
        for i in 0..mesh.num_points() {
            self.write_vec3(mesh.points[i])?;
            if layout.has_normals() {
                self.write_vec3(mesh.normals[i])?;
            }
            if layout.has_colors() {
                self.writer.write_all(&mesh.colors[i].to_array())?;
            }
        }

        for face in mesh.faces() {
            self.writer.write_u8(3)?;
            for &index in face {
                self.writer.write_i32::<LittleEndian>(face_index(index)?)?;
            }
        }

        for edge in &mesh.edges {
            self.writer.write_i32::<LittleEndian>(edge.start)?;
            self.writer.write_i32::<LittleEndian>(edge.end)?;
            let c = edge.color;
            self.writer.write_all(&[c.red, c.green, c.blue])?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_vec3(&mut self, v: [f32; 3]) -> io::Result<()> {
        for c in v {
            self.writer.write_f32::<LittleEndian>(c)?;
        }
        Ok(())
    }
}

/// Face indices are declared `int` in the header.
pub(crate) fn face_index(index: u32) -> Result<i32> {
    i32::try_from(index)
        .map_err(|_| MeshIoError::InvalidScene(format!("face index {index} does not fit an int")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshport_core::{Color, Edge};
    use std::io::Cursor;

    fn face_element() -> ElementDecl {
        let mut element = ElementDecl::new("face", 1);
        element.add_list("vertex_indices", ScalarType::UInt8, ScalarType::Int32);
        element
    }

    #[test]
    fn test_read_list_record() {
        let mut bytes = vec![3u8];
        for i in [7i32, 8, 9] {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        let mut reader = BinaryReader::new(Cursor::new(bytes));
        let tokens = reader.read_record(&face_element()).unwrap().unwrap();
        assert_eq!(tokens, vec!["3", "7", "8", "9"]);
        assert!(reader.read_record(&face_element()).unwrap().is_none());
        assert_eq!(reader.state(), CodecState::Exhausted);
    }

    #[test]
    fn test_short_read_is_truncated() {
        let mut element = ElementDecl::new("vertex", 1);
        element.add_scalar("x", ScalarType::Float32);
        element.add_scalar("y", ScalarType::Float32);

        let mut reader = BinaryReader::new(Cursor::new(vec![0u8; 6]));
        let err = reader.read_record(&element).unwrap_err();
        assert!(matches!(err, MeshIoError::TruncatedRecord { ref element, .. } if element == "vertex"));
    }

    #[test]
    fn test_float_tokens_keep_precision() {
        let mut element = ElementDecl::new("vertex", 1);
        element.add_scalar("x", ScalarType::Float64);
        let value = 0.1f64 + 0.2;
        let mut reader = BinaryReader::new(Cursor::new(value.to_le_bytes().to_vec()));
        let tokens = reader.read_record(&element).unwrap().unwrap();
        assert_eq!(tokens[0].parse::<f64>().unwrap(), value);
    }

    #[test]
    fn test_write_layout_bytes() {
        let mut mesh = Mesh::from_points(vec![[1.0, 2.0, 3.0]]);
        mesh.colors.push(Color::new(4, 5, 6, 7));
        mesh.edges.push(Edge::new(0, 1, Color::new(8, 9, 10, 11)));

        let mut out = Vec::new();
        BinaryWriter::new(&mut out).write_records(&mesh).unwrap();

        let mut expected = Vec::new();
        for f in [1.0f32, 2.0, 3.0] {
            expected.extend_from_slice(&f.to_le_bytes());
        }
        expected.extend_from_slice(&[4, 5, 6, 7]);
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.extend_from_slice(&[8, 9, 10]);
        assert_eq!(out, expected);
    }
}
